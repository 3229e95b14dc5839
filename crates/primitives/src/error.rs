use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use http::StatusCode;
use serde::Serialize;
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidFormat,
    InvalidToken(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Missing Authorization header"),
            AuthError::InvalidFormat => write!(f, "Invalid Authorization header format"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
        }
    }
}

/// Which part of identity verification is still missing. All variants surface
/// as the same `kyc_required` error kind with a variant-specific user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KycGap {
    NotStarted,
    Pending,
    Rejected,
    Incomplete,
}

impl KycGap {
    pub fn user_message(&self) -> &'static str {
        match self {
            KycGap::NotStarted => {
                "Identity verification is required before booking. Please submit your documents."
            }
            KycGap::Pending => {
                "Your identity verification is still under review. Try again once it is approved."
            }
            KycGap::Rejected => {
                "Your identity verification was rejected. Please submit new documents."
            }
            KycGap::Incomplete => {
                "Your identity verification is incomplete. Please finish submitting your documents."
            }
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Forbidden(String),
    NotFound(String),
    InvalidState(String),
    CapacityExceeded { requested_kg: f64, available_kg: f64 },
    LimitExceeded(String),
    KycRequired(KycGap),
    Validation(validator::ValidationErrors),
    BadRequest(String),
    Processor(String),
    Webhook(String),
    Database(diesel::result::Error),
    Storage(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ApiError::CapacityExceeded {
                requested_kg,
                available_kg,
            } => write!(
                f,
                "Capacity exceeded: requested {} kg, only {} kg available",
                requested_kg, available_kg
            ),
            ApiError::LimitExceeded(msg) => write!(f, "Limit exceeded: {}", msg),
            ApiError::KycRequired(gap) => write!(f, "KYC required: {}", gap.user_message()),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Processor(msg) => write!(f, "Payment processor error: {}", msg),
            ApiError::Webhook(msg) => write!(f, "Webhook error: {}", msg),
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::Storage(msg) => write!(f, "Storage error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl From<ApiError> for (StatusCode, ApiErrorResponse) {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(e) => (
                StatusCode::UNAUTHORIZED,
                ApiErrorResponse {
                    error: "unauthenticated",
                    message: e.to_string(),
                },
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ApiErrorResponse {
                    error: "forbidden",
                    message: msg,
                },
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiErrorResponse {
                    error: "not_found",
                    message: msg,
                },
            ),
            ApiError::InvalidState(msg) => (
                StatusCode::CONFLICT,
                ApiErrorResponse {
                    error: "invalid_state",
                    message: msg,
                },
            ),
            ApiError::CapacityExceeded {
                requested_kg,
                available_kg,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorResponse {
                    error: "capacity_exceeded",
                    message: format!(
                        "The announcement cannot take {} kg: only {} kg left",
                        requested_kg, available_kg
                    ),
                },
            ),
            ApiError::LimitExceeded(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorResponse {
                    error: "limit_exceeded",
                    message: msg,
                },
            ),
            ApiError::KycRequired(gap) => (
                StatusCode::FORBIDDEN,
                ApiErrorResponse {
                    error: "kyc_required",
                    message: gap.user_message().to_string(),
                },
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse {
                    error: "validation_failed",
                    message: errors.to_string(),
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse {
                    error: "bad_request",
                    message: msg,
                },
            ),
            // Processor detail is logged, never shown to the caller.
            ApiError::Processor(detail) => {
                error!("Payment processor failure: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorResponse {
                        error: "processor_error",
                        message: "The payment could not be processed. Please try again later."
                            .to_string(),
                    },
                )
            }
            ApiError::Webhook(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse {
                    error: "webhook_rejected",
                    message: msg,
                },
            ),
            ApiError::Database(e) => {
                error!("Database failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse {
                        error: "internal",
                        message: "Internal server error".to_string(),
                    },
                )
            }
            ApiError::Storage(detail) => {
                error!("Storage failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse {
                        error: "internal",
                        message: "Internal server error".to_string(),
                    },
                )
            }
            ApiError::Internal(detail) => {
                error!("Internal failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse {
                        error: "internal",
                        message: "Internal server error".to_string(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, ApiErrorResponse) = self.into();
        (status, Json(body)).into_response()
    }
}
