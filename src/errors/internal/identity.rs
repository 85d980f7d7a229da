use thiserror::Error;

/// Failures reported by an identity provider
#[derive(Error, Debug)]
pub enum IdentityError {
    /// No identity exists for the uid
    #[error("Identity not found: {uid}")]
    UserNotFound { uid: String },

    #[error("The email address is already in use by another account: {email}")]
    EmailAlreadyExists { email: String },

    #[error("The email address is improperly formatted: {email}")]
    InvalidEmail { email: String },

    #[error("The password is too weak: {reason}")]
    WeakPassword { reason: String },

    /// Any other provider-side rejection, carrying the provider's message
    #[error("Identity provider error: {message}")]
    Backend { message: String },
}
