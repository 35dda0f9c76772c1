use auth::IdentityClaim;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;

/// Identity of the bearer of the request token.
pub async fn me(
    Extension(identity): Extension<IdentityClaim>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user_id: i64,
    pub username: String,
}

impl From<IdentityClaim> for MeResponseData {
    fn from(identity: IdentityClaim) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username,
        }
    }
}
