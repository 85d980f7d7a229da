use thiserror::Error;

/// Transport-level failures talking to a REST backend
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP request for {operation} failed: {source}")]
    Request {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected HTTP status {status} for {operation}: {message}")]
    Status {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response for {operation}: {message}")]
    Decode { operation: String, message: String },
}

impl HttpError {
    pub fn request(operation: &str, source: reqwest::Error) -> Self {
        Self::Request {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn decode(operation: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
