use thiserror::Error;

/// Distinguishes credential rejections from everything else the auth
/// collaborator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The collaborator rejected the credentials (`invalid_grant`).
    InvalidGrant,
    /// Any other auth failure.
    Unknown,
}

#[derive(Error, Debug)]
pub enum TrackerError {
    /// Malformed data from the store or an input form. Validation failures
    /// abort the whole operation; nothing is partially applied.
    #[error("schema error: invalid `{field}`: {reason}")]
    Schema {
        field: &'static str,
        reason: String,
    },

    /// Surfaced to the user as a message; never alters the persisted session.
    #[error("authentication failed: {message}")]
    Auth {
        kind: AuthErrorKind,
        message: String,
    },

    /// Transient transport failure. Not retried here; the caller may retry.
    #[error("network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn schema(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Schema {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::Auth {
            kind: AuthErrorKind::InvalidGrant,
            message: message.into(),
        }
    }

    pub fn auth_unknown(message: impl Into<String>) -> Self {
        Self::Auth {
            kind: AuthErrorKind::Unknown,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
