use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use sqlx::error::ErrorKind;
use tracing::error;

use crate::engine::rules::RuleViolation;

/// Service-wide error taxonomy. Business-rule errors carry their own
/// user-facing message and propagate unchanged; everything unexpected is
/// logged where it happens and collapsed to `Internal` so no store detail
/// leaks to the caller.
#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "Ongoing leave records cannot be {}", _0)]
    OngoingImmutable(&'static str),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Internal Server Error")]
    Internal,
}

impl From<RuleViolation> for ServiceError {
    fn from(violation: RuleViolation) -> Self {
        ServiceError::Validation(violation.to_string())
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.kind() {
                // The employee row vanished between the directory lookup
                // and the insert (cascade delete racing this transaction).
                ErrorKind::ForeignKeyViolation => return ServiceError::NotFound("Employee"),
                ErrorKind::UniqueViolation => {
                    return ServiceError::Conflict("Duplicate record".into());
                }
                _ => {}
            }
        }
        error!(error = %err, "Database error");
        ServiceError::Internal
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) | ServiceError::OngoingImmutable(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.to_string(),
        }))
    }
}
