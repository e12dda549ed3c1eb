use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Error as SqlxError;
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CopydeskError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Account {0} not found")]
    AccountNotFound(i64),

    #[error("Payment provider is not configured")]
    PaymentsNotConfigured,

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Gemini API error: {} ({})", .0.error.message, .0.error.status)]
    GeminiServerError(GeminiError),

    #[error("Stripe API error: {}", .0.error.message.as_deref().unwrap_or("unknown"))]
    StripeServerError(StripeError),
}

impl From<argon2::password_hash::Error> for CopydeskError {
    fn from(e: argon2::password_hash::Error) -> Self {
        CopydeskError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for CopydeskError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            CopydeskError::DatabaseError(_)
            | CopydeskError::PasswordHash(_)
            | CopydeskError::Json(_)
            | CopydeskError::UrlParse(_) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (status, body)
            }
            CopydeskError::DuplicateUsername => {
                let status = StatusCode::CONFLICT;
                let body = ApiErrorBody {
                    code: "DUPLICATE_USERNAME".to_string(),
                    message: "Username already exists.".to_string(),
                };
                (status, body)
            }
            CopydeskError::AccountNotFound(_) => {
                let status = StatusCode::NOT_FOUND;
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "Account not found.".to_string(),
                };
                (status, body)
            }
            CopydeskError::PaymentsNotConfigured => {
                let status = StatusCode::SERVICE_UNAVAILABLE;
                let body = ApiErrorBody {
                    code: "PAYMENTS_UNAVAILABLE".to_string(),
                    message: "Payments are not available right now.".to_string(),
                };
                (status, body)
            }
            CopydeskError::Reqwest(_)
            | CopydeskError::MalformedResponse(_)
            | CopydeskError::GeminiServerError(_)
            | CopydeskError::StripeServerError(_) => {
                let status = StatusCode::BAD_GATEWAY;
                let body = ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "Upstream service is unavailable.".to_string(),
                };
                (status, body)
            }
            CopydeskError::UpstreamStatus(code) => {
                let (err_code, msg) = match code {
                    StatusCode::TOO_MANY_REQUESTS => {
                        ("RATE_LIMIT", "Upstream rate limit exceeded.")
                    }
                    StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Upstream authentication failed."),
                    StatusCode::FORBIDDEN => ("FORBIDDEN", "Upstream permission denied."),
                    _ => ("UPSTREAM_ERROR", "An upstream error occurred."),
                };

                (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorBody {
                        code: err_code.to_string(),
                        message: msg.to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Gemini API error response structure
#[derive(Deserialize, Debug)]
pub struct GeminiError {
    pub error: GeminiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct GeminiErrorBody {
    pub code: u32,
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Stripe API error response structure
#[derive(Deserialize, Debug)]
pub struct StripeError {
    pub error: StripeErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct StripeErrorBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}
