use async_trait::async_trait;
use meeple_ledger::domain::ports::AuthClient;
use meeple_ledger::domain::session::{Credentials, SignInParams};
use meeple_ledger::error::{Result, TrackerError};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

pub fn credentials(expires_at: i64) -> Credentials {
    Credentials {
        user_id: "user-1".into(),
        access_token: "access".into(),
        expires_at,
        refresh_token: Some("refresh".into()),
    }
}

pub fn params() -> SignInParams {
    SignInParams {
        email: "player@example.com".into(),
        password: "hunter2hunter2".into(),
    }
}

/// Programmable auth collaborator with call counters.
#[derive(Default)]
pub struct FakeAuthClient {
    pub sign_in_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
    sign_in_outcome: Mutex<Option<Credentials>>,
    refresh_outcome: Mutex<Option<Credentials>>,
    fail_sign_out: AtomicBool,
}

impl FakeAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next `sign_in` calls succeed with these credentials.
    pub fn succeed_sign_in(&self, creds: Credentials) {
        *self.sign_in_outcome.lock().unwrap() = Some(creds);
    }

    /// Next `refresh` calls succeed with these credentials.
    pub fn succeed_refresh(&self, creds: Credentials) {
        *self.refresh_outcome.lock().unwrap() = Some(creds);
    }

    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthClient for FakeAuthClient {
    async fn sign_in(&self, _params: &SignInParams) -> Result<Credentials> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in_outcome
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TrackerError::invalid_grant("Invalid login credentials"))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<Credentials> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_outcome
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TrackerError::invalid_grant("refresh token rejected"))
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            Err(TrackerError::Network("connection reset".into()))
        } else {
            Ok(())
        }
    }
}
