use thiserror::Error;

pub mod audit;
pub mod database;
pub mod http;
pub mod identity;
pub mod profile;
pub mod token;

pub use audit::AuditError;
pub use database::DatabaseError;
pub use http::HttpError;
pub use identity::IdentityError;
pub use profile::ProfileError;
pub use token::TokenError;

/// Internal error type for store, provider and coordinator operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors
/// (one per collaborator). Not exposed via API: the staff coordinator folds these
/// into `StaffError`, and endpoints convert that to `StaffApiError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True when the identity provider reported that the uid does not exist
    pub fn is_identity_not_found(&self) -> bool {
        matches!(self, InternalError::Identity(IdentityError::UserNotFound { .. }))
    }
}
