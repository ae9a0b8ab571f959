use crate::domain::session::Credentials;
use crate::error::{Result, TrackerError};
use serde::Deserialize;

/// Success body of the auth collaborator's token endpoint, for both the
/// password and refresh-token grants.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    /// Credential lifetime in seconds.
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct AuthUser {
    pub id: String,
}

impl AuthResponse {
    /// Converts the wire shape into domain credentials, resolving the
    /// relative `expires_in` against `now_ms`.
    pub fn into_credentials(self, now_ms: i64) -> Result<Credentials> {
        if self.expires_in <= 0 {
            return Err(TrackerError::schema("expires_in", "must be positive"));
        }
        let credentials = Credentials {
            user_id: self.user.id,
            access_token: self.access_token,
            expires_at: now_ms + self.expires_in * 1000,
            refresh_token: Some(self.refresh_token),
        };
        credentials.validate()?;
        Ok(credentials)
    }
}

/// Error body of the auth collaborator, carrying a machine-readable code.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Parses a success payload into credentials.
pub fn parse_auth_success(body: &str, now_ms: i64) -> Result<Credentials> {
    let response: AuthResponse = serde_json::from_str(body)
        .map_err(|err| TrackerError::schema("auth_response", err.to_string()))?;
    response.into_credentials(now_ms)
}

/// Maps an error payload to the auth taxonomy: `invalid_grant` means the
/// credentials were rejected, anything else is unknown.
pub fn parse_auth_failure(body: &str) -> TrackerError {
    let parsed: AuthErrorBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return TrackerError::auth_unknown("unrecognized auth error payload"),
    };

    let message = parsed
        .error_description
        .or_else(|| parsed.error.clone())
        .unwrap_or_else(|| "authentication failed".into());

    match parsed.error.as_deref() {
        Some("invalid_grant") => TrackerError::invalid_grant(message),
        _ => TrackerError::auth_unknown(message),
    }
}
