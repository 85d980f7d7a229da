use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::errors::InternalError;
use crate::errors::internal::HttpError;

use super::types::GoogleErrorEnvelope;

/// Authenticated HTTP client shared by the Firebase adapters
pub struct FirebaseClient {
    http: reqwest::Client,
    project_id: String,
    access_token: String,
}

impl FirebaseClient {
    /// Build a client whose every request carries `access_token` as a bearer token
    ///
    /// # Arguments
    /// * `project_id` - Firebase / GCP project id
    /// * `access_token` - OAuth2 token with the Identity Toolkit and Datastore scopes
    /// * `timeout` - Per-request timeout
    pub fn new(
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InternalError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::request("build_http_client", e))?;

        Ok(Self {
            http,
            project_id: project_id.into(),
            access_token: access_token.into(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.access_token)
    }

    /// Send a request, converting transport failures into `HttpError::Request`
    ///
    /// Non-2xx responses are returned as-is so callers can map provider codes.
    pub(crate) async fn send(&self, operation: &str, builder: RequestBuilder) -> Result<Response, InternalError> {
        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::request(operation, e))?;

        tracing::debug!(operation, status = response.status().as_u16(), "Firebase response");

        Ok(response)
    }
}

/// Decode a successful JSON response body
pub(crate) async fn decode_json<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, InternalError> {
    response
        .json::<T>()
        .await
        .map_err(|e| HttpError::decode(operation, e.to_string()).into())
}

/// Status code and provider message of a failed response
///
/// Prefers the `error.message` of the Google error envelope, falling back to the raw body.
pub(crate) async fn error_details(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GoogleErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or(body);

    (status, message)
}

/// Generic mapping for failures that have no domain-specific meaning
pub(crate) fn unexpected_status(operation: &str, status: u16, message: String) -> InternalError {
    HttpError::Status {
        operation: operation.to_string(),
        status,
        message,
    }
    .into()
}
