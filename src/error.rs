use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Failures raised by a record or course repository.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "data file I/O failed: {}", _0)]
    Io(std::io::Error),

    #[display(fmt = "data file is not a valid JSON sequence: {}", _0)]
    Malformed(serde_json::Error),

    #[display(fmt = "Duplicate submission detected")]
    DuplicateSubmission,
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Malformed(e)
    }
}

/// Errors returned to HTTP clients as `{"error": "..."}`.
#[derive(Debug, Display, PartialEq)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    BadRequest(String),

    #[display(fmt = "Duplicate submission detected")]
    DuplicateSubmission,

    #[display(fmt = "Invalid verification code")]
    InvalidVerificationCode,

    /// Generic message; the cause is logged where it happened.
    #[display(fmt = "{}", _0)]
    Internal(&'static str),
}

impl ApiError {
    /// Logs `cause` and hides it behind the endpoint's generic message.
    pub fn internal(message: &'static str, cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "{}", message);
        ApiError::Internal(message)
    }

    /// Keeps the duplicate rejection distinct, every other store failure is a 500.
    pub fn from_store(message: &'static str, e: StoreError) -> Self {
        match e {
            StoreError::DuplicateSubmission => ApiError::DuplicateSubmission,
            other => ApiError::internal(message, other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::DuplicateSubmission
            | ApiError::InvalidVerificationCode => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_store_error_stays_a_bad_request() {
        let e = ApiError::from_store("Failed to add attendance record", StoreError::DuplicateSubmission);
        assert_eq!(e, ApiError::DuplicateSubmission);
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "Duplicate submission detected");
    }

    #[test]
    fn io_store_error_becomes_generic_internal_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "attendance.json");
        let e = ApiError::from_store("Failed to read attendance data", StoreError::from(io));
        assert_eq!(e, ApiError::Internal("Failed to read attendance data"));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
