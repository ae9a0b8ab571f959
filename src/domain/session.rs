use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};

/// The credential set returned by the auth collaborator and persisted in the
/// durable store between runs.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub access_token: String,
    /// Expiry instant, epoch milliseconds.
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Validates the persisted-session schema: non-empty strings for tokens
    /// and ids, positive epoch for the expiry. A payload failing this is
    /// treated as absent by the lifecycle.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.is_empty() {
            return Err(TrackerError::schema("user_id", "must not be empty"));
        }
        if self.access_token.is_empty() {
            return Err(TrackerError::schema("access_token", "must not be empty"));
        }
        if self.expires_at <= 0 {
            return Err(TrackerError::schema(
                "expires_at",
                "must be a positive epoch timestamp",
            ));
        }
        if let Some(token) = &self.refresh_token
            && token.is_empty()
        {
            return Err(TrackerError::schema("refresh_token", "must not be empty"));
        }
        Ok(())
    }

    /// True when the credential expires more than `buffer_ms` from `now_ms`.
    pub fn is_fresh(&self, now_ms: i64, buffer_ms: i64) -> bool {
        self.expires_at > now_ms + buffer_ms
    }
}

/// The lifecycle states of the process-wide session.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum SessionState {
    /// Process start; `restore` has not completed yet.
    #[default]
    Uninitialized,
    /// No credential; also the safe fallback after any lifecycle failure.
    Anonymous,
    Authenticated(Credentials),
}

impl SessionState {
    /// True once `restore` (or any later transition) has settled the state.
    pub fn is_initialized(&self) -> bool {
        !matches!(self, SessionState::Uninitialized)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            SessionState::Authenticated(creds) => Some(creds),
            _ => None,
        }
    }
}

/// Sign-in form input.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct SignInParams {
    pub email: String,
    pub password: String,
}

const MIN_PASSWORD_LEN: usize = 8;

impl SignInParams {
    pub fn validate(&self) -> Result<()> {
        // Minimal email shape check; the collaborator is the authority.
        let valid_email = self
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(TrackerError::schema("email", "must be a valid address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(TrackerError::schema(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        Ok(())
    }
}
