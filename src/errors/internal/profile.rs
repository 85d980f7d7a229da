use thiserror::Error;

/// Failures reported by a profile document store
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile document is malformed for {uid}: {reason}")]
    Malformed { uid: String, reason: String },

    /// The uid cannot be used as a document key
    #[error("Invalid profile key: {uid:?}")]
    InvalidUid { uid: String },

    #[error("Profile store error: {message}")]
    Backend { message: String },
}
