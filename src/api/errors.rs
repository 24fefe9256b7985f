use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::domain::notification::DispatchError;
use crate::domain::player::ValidationErrors;
use crate::domain::repositories::StoreError;

/// API error type with HTTP status code and message
///
/// Every domain failure is converted into this type exactly once, through
/// the `From` impls below.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field validation failures
    pub details: Option<Value>,
    /// Status returned by the upstream service that caused this error
    pub upstream_status: Option<u16>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            upstream_status: None,
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 406 Not Acceptable error
    pub fn not_acceptable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_ACCEPTABLE, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Creates a 502 Bad Gateway error
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Creates a 504 Gateway Timeout error
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        if let Some(status) = self.upstream_status {
            body["upstream_status"] = json!(status);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingHeader => Self::bad_request(error.to_string()),
            AuthError::Rejected(body) => Self::unauthorized(body),
            AuthError::Timeout => Self::gateway_timeout(error.to_string()),
            AuthError::Transport(_) | AuthError::InvalidResponse(_) => {
                Self::bad_gateway(error.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidIdentifier(raw) => {
                Self::bad_request(format!("'{}' is not a valid player id", raw))
            }
            StoreError::NotFound => Self::bad_request("player not found"),
            StoreError::Database(e) => {
                tracing::error!(error = %e, "Storage error");
                Self::internal_server_error("An internal error occurred")
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut error = Self::bad_request("Validation failed");
        error.details = Some(json!(errors.into_errors()));
        error
    }
}

impl From<DispatchError> for ApiError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::Rejected { status, message } => {
                let mut error = Self::bad_gateway(format!("mail not sent: {}", message));
                error.upstream_status = Some(status);
                error
            }
            DispatchError::Timeout => Self::gateway_timeout(error.to_string()),
            DispatchError::Transport(_) => Self::bad_gateway(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::validate_new_player;

    #[test]
    fn missing_authorization_is_bad_request() {
        let error = ApiError::from(AuthError::MissingHeader);
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.message, "no Authorization on request header");
    }

    #[test]
    fn rejected_token_keeps_upstream_body() {
        let error = ApiError::from(AuthError::Rejected("token expired".to_string()));
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.message, "token expired");
    }

    #[test]
    fn upstream_outages_map_to_gateway_errors() {
        assert_eq!(
            ApiError::from(AuthError::Timeout).status,
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::from(AuthError::Transport("refused".to_string())).status,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(DispatchError::Timeout).status,
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn store_lookup_failures_are_bad_requests() {
        let invalid = ApiError::from(StoreError::InvalidIdentifier("12".to_string()));
        let missing = ApiError::from(StoreError::NotFound);

        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_ne!(invalid.message, missing.message);
    }

    #[test]
    fn validation_errors_carry_details() {
        let errors = validate_new_player(&json!({})).unwrap_err();
        let error = ApiError::from(errors);

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        let details = error.details.expect("details present");
        assert_eq!(details.as_array().unwrap().len(), 4);
        assert_eq!(details[0]["rule"], "required");
    }

    #[test]
    fn dispatch_rejection_keeps_upstream_status() {
        let error = ApiError::from(DispatchError::Rejected {
            status: 401,
            message: "bad key".to_string(),
        });

        assert_eq!(error.status, StatusCode::BAD_GATEWAY);
        assert_eq!(error.upstream_status, Some(401));
        assert!(error.message.contains("bad key"));
    }
}
