use crate::errors::internal::{InternalError, TokenError};
use crate::errors::staff::{StaffError, StaffErrorKind};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for staff endpoints
#[derive(Object, Debug)]
pub struct StaffErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Staff endpoint error types
#[derive(ApiResponse, Debug)]
pub enum StaffApiError {
    /// A required field was missing or empty
    #[oai(status = 400)]
    InvalidArgument(Json<StaffErrorResponse>),

    /// Missing, malformed or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<StaffErrorResponse>),

    /// Authenticated caller lacks the admin claim
    #[oai(status = 403)]
    Forbidden(Json<StaffErrorResponse>),

    /// A collaborator failed
    #[oai(status = 500)]
    Internal(Json<StaffErrorResponse>),
}

impl StaffApiError {
    pub fn invalid_argument(message: String) -> Self {
        StaffApiError::InvalidArgument(Json(StaffErrorResponse {
            error: "invalid_argument".to_string(),
            message,
            status_code: 400,
        }))
    }

    pub fn unauthorized() -> Self {
        StaffApiError::Unauthorized(Json(StaffErrorResponse {
            error: "unauthorized".to_string(),
            message: "A valid bearer token is required".to_string(),
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        StaffApiError::Forbidden(Json(StaffErrorResponse {
            error: "forbidden".to_string(),
            message: "Admin privileges required".to_string(),
            status_code: 403,
        }))
    }

    pub fn internal(message: String) -> Self {
        StaffApiError::Internal(Json(StaffErrorResponse {
            error: "internal".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Convert a coordinator error to its HTTP representation
    ///
    /// Internal failures forward the collaborator's message; it has already
    /// been logged by the coordinator.
    pub fn from_staff_error(err: StaffError) -> Self {
        match err.kind {
            StaffErrorKind::InvalidArgument => Self::invalid_argument(err.message),
            StaffErrorKind::Internal => Self::internal(err.message),
        }
    }

    /// Convert a token validation failure
    ///
    /// Anything that is not a token problem means the validator itself broke.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Token(TokenError::Expired) | InternalError::Token(TokenError::Invalid { .. }) => {
                tracing::debug!("Rejected bearer token: {}", err);
                Self::unauthorized()
            }
            _ => {
                tracing::error!("Unexpected error while authorizing request: {}", err);
                Self::internal("An internal error occurred".to_string())
            }
        }
    }

    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    fn response(&self) -> &StaffErrorResponse {
        match self {
            StaffApiError::InvalidArgument(json)
            | StaffApiError::Unauthorized(json)
            | StaffApiError::Forbidden(json)
            | StaffApiError::Internal(json) => &json.0,
        }
    }
}

impl From<StaffError> for StaffApiError {
    fn from(err: StaffError) -> Self {
        Self::from_staff_error(err)
    }
}

impl fmt::Display for StaffApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
