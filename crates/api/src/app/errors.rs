//! The single error boundary for handlers.
//!
//! Every failure becomes an `ApiError`; its `IntoResponse` impl logs the
//! detail and returns a body that never includes it.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use brandkit_core::ValidationErrors;
use brandkit_infra::{DirectoryError, ProviderError, ServiceError};

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const INTERNAL: &str = "Internal server error";
pub const PERMISSIONS_UNAVAILABLE: &str = "Unable to load permissions";
pub const PROVIDER_UNAVAILABLE: &str = "Authentication service unavailable";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no valid session")]
    Unauthenticated,

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("credentials rejected: {0}")]
    InvalidCredentials(String),

    #[error("auth provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("permissions unavailable: {0}")]
    PermissionsUnavailable(String),

    /// Failure inside a login/logout action; those endpoints answer with
    /// `{success:false, message}` rather than `{error}`.
    #[error("{message}: {detail}")]
    ActionFailed { message: &'static str, detail: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn action_failed(message: &'static str, detail: impl Into<String>) -> Self {
        Self::ActionFailed {
            message,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PermissionsUnavailable(_)
            | ApiError::ActionFailed { .. }
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(value: DirectoryError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Internal(value.to_string())
    }
}

/// Login-side mapping: rejection is the caller's fault, the rest is ours.
impl From<ProviderError> for ApiError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::Rejected(msg) => Self::InvalidCredentials(msg),
            ProviderError::Unavailable(detail) => Self::ProviderUnavailable(detail),
            ProviderError::Unexpected(detail) => Self::action_failed(INTERNAL, detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Unauthenticated => {
                tracing::debug!("rejecting unauthenticated request");
                json!({ "error": UNAUTHORIZED })
            }
            ApiError::Validation(errors) => {
                tracing::debug!(%errors, "request failed validation");
                json!({
                    "success": false,
                    "message": "Validation error",
                    "errors": errors,
                })
            }
            ApiError::InvalidCredentials(message) => {
                tracing::info!("login rejected by auth provider");
                json!({ "success": false, "message": message })
            }
            ApiError::ProviderUnavailable(detail) => {
                tracing::error!(%detail, "auth provider unreachable");
                json!({ "success": false, "message": PROVIDER_UNAVAILABLE })
            }
            ApiError::PermissionsUnavailable(detail) => {
                tracing::error!(%detail, "permission snapshot empty");
                json!({ "error": PERMISSIONS_UNAVAILABLE })
            }
            ApiError::ActionFailed { message, detail } => {
                tracing::error!(%detail, "{message}");
                json!({ "success": false, "message": message })
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                json!({ "error": INTERNAL })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

/// Response for a handler that panicked (installed via `CatchPanicLayer`).
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(%detail, "handler panicked");

    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Validation(ValidationErrors::single("email", "bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InvalidCredentials("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::ProviderUnavailable("down".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::PermissionsUnavailable("none".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::internal("boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn provider_errors_map_to_login_outcomes() {
        assert!(matches!(
            ApiError::from(ProviderError::Rejected("nope".into())),
            ApiError::InvalidCredentials(m) if m == "nope"
        ));
        assert!(matches!(
            ApiError::from(ProviderError::Unavailable("timeout".into())),
            ApiError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(ProviderError::Unexpected("weird".into())),
            ApiError::ActionFailed { .. }
        ));
    }

    #[test]
    fn panic_payloads_become_generic_500() {
        let resp = panic_response(Box::new("kaboom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
