use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Issuer and audience of every issued token.
pub const SERVICE_NAME: &str = "web-resume";

/// Validity window of an issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Identity embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: i64,
    pub username: String,
}

impl IdentityClaim {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Full claim set of an access token.
///
/// Registered claims follow RFC 7519; the identity travels under `data`.
/// Only `data` and `exp` must be present in a decoded token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    pub data: IdentityClaim,

    /// Issuer
    #[serde(default)]
    pub iss: String,

    /// Audience
    #[serde(default)]
    pub aud: String,

    /// JWT ID, unique per token
    #[serde(default)]
    pub jti: String,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Not before (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Claims for a token issued at `issued_at`.
    ///
    /// The token becomes valid immediately and expires
    /// [`TOKEN_LIFETIME_HOURS`] later.
    pub fn for_identity(data: IdentityClaim, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            data,
            iss: SERVICE_NAME.to_string(),
            aud: SERVICE_NAME.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            nbf: Some(issued_at.timestamp()),
            exp: expiration.timestamp(),
        }
    }

    /// Set not before (Unix timestamp).
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if the token is inside its validity window.
    ///
    /// Without `nbf` the window opens at the beginning of time.
    pub fn is_active(&self, current_timestamp: i64) -> bool {
        self.nbf.map_or(true, |nbf| nbf <= current_timestamp) && current_timestamp <= self.exp
    }
}
