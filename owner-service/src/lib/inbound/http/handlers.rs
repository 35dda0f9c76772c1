use std::collections::BTreeMap;

use auth::Error;
use auth::ErrorKind;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

pub mod login;
pub mod me;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// HTTP face of [`auth::Error`].
///
/// Only the status, message and details reach the client. Server errors
/// are logged with their cause and stack.
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn into_inner(self) -> Error {
        self.0
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error = %err,
                error_stack = %err.error_stack(),
                "Request failed"
            );
        }

        // Unclassified errors have no message of their own, only a cause.
        let message = match err.kind() {
            Some(_) => err.message().to_string(),
            None => ErrorKind::Internal.as_str().to_string(),
        };
        let details = (!err.details().is_empty()).then(|| err.details().clone());

        (
            status,
            Json(ApiResponseBody::new_error(status, message, details)),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(
        status_code: StatusCode,
        message: String,
        details: Option<BTreeMap<String, serde_json::Value>>,
    ) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, details },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use auth::Cause;
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_carries_message_and_status() {
        let err = Error::new(
            ErrorKind::InvalidParameter,
            "username or email or password is invalid",
        );

        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status_code"], 400);
        assert_eq!(
            body["data"]["message"],
            "username or email or password is invalid"
        );
        assert!(body["data"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_error_response_hides_cause() {
        let err = Error::with_cause(
            ErrorKind::Internal,
            "failed to query owner account",
            Cause::message("password authentication failed for user \"web_resume\""),
        );

        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "failed to query owner account");
        assert!(!body.to_string().contains("web_resume"));
    }

    #[tokio::test]
    async fn test_unclassified_error_is_internal() {
        let err = Error::msg("connection reset by peer");

        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_error_response_includes_details() {
        let err = Error::new(ErrorKind::InvalidParameter, "password too long")
            .with_detail("max_bytes", 72);

        let body = body_json(ApiError::from(err).into_response()).await;
        assert_eq!(body["data"]["details"]["max_bytes"], 72);
    }
}
