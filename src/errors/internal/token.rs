use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {reason}")]
    Invalid { reason: String },

    #[error("Token issuance failed: {reason}")]
    Issuance { reason: String },
}
