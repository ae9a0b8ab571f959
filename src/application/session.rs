use crate::domain::ports::{AuthClientRef, SessionStoreRef};
use crate::domain::session::{Credentials, SessionState, SignInParams};
use crate::error::Result;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Refresh is attempted this long before the credential expires.
pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::from_secs(60);

/// Drives the session state machine over injected collaborator ports.
///
/// `SessionManager` owns the process-wide session: restore it from the
/// durable store at startup, keep it alive with a single pending refresh
/// timer, and fall back to [`SessionState::Anonymous`] whenever the
/// credential cannot be kept valid. Handles are cheap to clone and share the
/// same state. Racing `sign_in`/`refresh` calls are last-writer-wins by
/// design; this is a single-user scope.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    auth: AuthClientRef,
    store: SessionStoreRef,
    refresh_buffer: Duration,
    state: RwLock<SessionState>,
    refresh_timer: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        abort_timer(&self.refresh_timer);
    }
}

fn abort_timer(slot: &Mutex<Option<JoinHandle<()>>>) {
    let mut guard = match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(handle) = guard.take() {
        handle.abort();
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl SessionManager {
    pub fn new(auth: AuthClientRef, store: SessionStoreRef) -> Self {
        Self::with_refresh_buffer(auth, store, DEFAULT_REFRESH_BUFFER)
    }

    pub fn with_refresh_buffer(
        auth: AuthClientRef,
        store: SessionStoreRef,
        refresh_buffer: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth,
                store,
                refresh_buffer,
                state: RwLock::new(SessionState::Uninitialized),
                refresh_timer: Mutex::new(None),
            }),
        }
    }

    /// Current state, as a snapshot.
    pub async fn state(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.inner.state.read().await, SessionState::Authenticated(_))
    }

    /// Restores the session from the durable store.
    ///
    /// An absent or malformed payload settles to `Anonymous` without touching
    /// the network. A valid credential that expires more than the refresh
    /// buffer from now authenticates directly and schedules the next refresh;
    /// one that is near or past expiry triggers exactly one refresh attempt,
    /// provided a refresh token is stored. Always leaves the manager
    /// initialized.
    pub async fn restore(&self) {
        match self.inner.store.load().await {
            Ok(Some(creds)) if creds.validate().is_ok() => {
                if creds.is_fresh(now_ms(), self.buffer_ms()) {
                    debug!(user_id = %creds.user_id, "restored persisted session");
                    self.set_authenticated(creds).await;
                } else if let Some(token) = creds.refresh_token.clone() {
                    debug!("persisted session near expiry, refreshing");
                    self.refresh_with(&token).await;
                } else {
                    debug!("persisted session expired with no refresh token");
                    self.clear_to_anonymous().await;
                }
            }
            Ok(Some(_)) => {
                warn!("persisted session failed validation, treating as absent");
                *self.inner.state.write().await = SessionState::Anonymous;
            }
            Ok(None) => {
                *self.inner.state.write().await = SessionState::Anonymous;
            }
            Err(err) => {
                warn!(error = %err, "failed to read persisted session");
                *self.inner.state.write().await = SessionState::Anonymous;
            }
        }
    }

    /// Exchanges credentials with the auth collaborator.
    ///
    /// On success the credential is persisted, the state becomes
    /// `Authenticated`, and the next refresh is scheduled. On failure the
    /// error surfaces and neither state nor storage changes.
    pub async fn sign_in(&self, params: &SignInParams) -> Result<()> {
        params.validate()?;
        let creds = self.inner.auth.sign_in(params).await?;
        self.persist(&creds).await;
        self.set_authenticated(creds).await;
        Ok(())
    }

    /// Renews the credential using the stored refresh token.
    ///
    /// Failures degrade to `Anonymous` (persisted copy cleared, timer
    /// cancelled) rather than propagating; a logged-out state is always a
    /// safe fallback.
    pub async fn refresh(&self) {
        let token = self
            .inner
            .state
            .read()
            .await
            .credentials()
            .and_then(|c| c.refresh_token.clone());

        match token {
            Some(token) => self.refresh_with(&token).await,
            None => {
                debug!("refresh requested without a refresh token");
                self.clear_to_anonymous().await;
            }
        }
    }

    /// Clears the persisted credential and transitions to `Anonymous`. The
    /// collaborator sign-out is best-effort; storage is cleared regardless.
    pub async fn logout(&self) {
        abort_timer(&self.inner.refresh_timer);
        if let Err(err) = self.inner.store.clear().await {
            warn!(error = %err, "failed to clear persisted session");
        }
        if let Err(err) = self.inner.auth.sign_out().await {
            debug!(error = %err, "collaborator sign-out failed, ignoring");
        }
        *self.inner.state.write().await = SessionState::Anonymous;
    }

    /// Cancels the pending refresh timer, if any. Called on process teardown
    /// so a stale session is never acted on; dropping the last handle does
    /// the same.
    pub fn shutdown(&self) {
        abort_timer(&self.inner.refresh_timer);
    }

    async fn refresh_with(&self, token: &str) {
        match self.inner.auth.refresh(token).await {
            Ok(creds) => {
                debug!(user_id = %creds.user_id, "session refreshed");
                self.persist(&creds).await;
                self.set_authenticated(creds).await;
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed, degrading to anonymous");
                self.clear_to_anonymous().await;
            }
        }
    }

    async fn set_authenticated(&self, creds: Credentials) {
        self.schedule_refresh(creds.expires_at);
        *self.inner.state.write().await = SessionState::Authenticated(creds);
    }

    async fn persist(&self, creds: &Credentials) {
        // The in-memory session stays valid even when the durable copy
        // cannot be written; the next acquisition retries the write.
        if let Err(err) = self.inner.store.save(creds).await {
            warn!(error = %err, "failed to persist session");
        }
    }

    async fn clear_to_anonymous(&self) {
        abort_timer(&self.inner.refresh_timer);
        if let Err(err) = self.inner.store.clear().await {
            warn!(error = %err, "failed to clear persisted session");
        }
        *self.inner.state.write().await = SessionState::Anonymous;
    }

    /// Arms the refresh timer for `expires_at - buffer`, replacing (and
    /// cancelling) any previously pending timer so at most one exists.
    fn schedule_refresh(&self, expires_at: i64) {
        let delay_ms = (expires_at - self.buffer_ms() - now_ms()).max(0);
        let delay = Duration::from_millis(delay_ms as u64);

        // Weak handle: the timer must not keep the manager alive.
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        // Fix the deadline now, at arming time, so it is registered with the
        // clock before the task is first polled.
        let deadline = tokio::time::Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                // The slot still holds this task's own handle; take it out
                // (without aborting) so the reschedule after a successful
                // refresh does not cancel the running task.
                {
                    let mut guard = match inner.refresh_timer.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    guard.take();
                }
                SessionManager { inner }.refresh().await;
            }
        });

        let mut guard = match self.inner.refresh_timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    fn buffer_ms(&self) -> i64 {
        self.inner.refresh_buffer.as_millis() as i64
    }
}
