use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Kept deliberately small: who the token is for, their username, and its validity window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (external user identifier)
    pub sub: String,

    /// Username at the time of issuance
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid from now for `ttl`.
    ///
    /// # Arguments
    /// * `user_id` - External user identifier
    /// * `username` - Username to embed
    /// * `ttl` - Token lifetime
    pub fn for_user(user_id: impl ToString, username: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}
