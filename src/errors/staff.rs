use std::fmt;

use thiserror::Error;

use crate::errors::InternalError;

/// Kind of failure surfaced by the staff lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffErrorKind {
    /// Required input was absent; nothing was changed
    InvalidArgument,
    /// A collaborator failed; the message carries its detail
    Internal,
}

impl StaffErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for StaffErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by `StaffCoordinator` operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct StaffError {
    pub kind: StaffErrorKind,
    pub message: String,
}

impl StaffError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            kind: StaffErrorKind::InvalidArgument,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: StaffErrorKind::Internal,
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind == StaffErrorKind::InvalidArgument
    }

    pub fn is_internal(&self) -> bool {
        self.kind == StaffErrorKind::Internal
    }
}

impl From<InternalError> for StaffError {
    fn from(err: InternalError) -> Self {
        StaffError::internal(err.to_string())
    }
}
