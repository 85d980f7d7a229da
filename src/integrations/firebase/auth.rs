use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use crate::errors::InternalError;
use crate::errors::internal::IdentityError;
use crate::providers::IdentityProvider;
use crate::types::internal::staff::NewIdentity;

use super::client::{decode_json, error_details, unexpected_status, FirebaseClient};
use super::types::{BatchGetResponse, CreateAccountRequest, CreateAccountResponse, DeleteAccountRequest};

const LIST_PAGE_SIZE: &str = "1000";

/// Identity provider backed by the Firebase Auth (Identity Toolkit) admin REST API
pub struct FirebaseIdentityProvider {
    client: Arc<FirebaseClient>,
    base_url: String,
}

impl FirebaseIdentityProvider {
    /// # Arguments
    /// * `base_url` - Identity Toolkit origin, e.g. `https://identitytoolkit.googleapis.com`
    ///   or an emulator address
    pub fn new(client: Arc<FirebaseClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn accounts_url(&self, suffix: &str) -> String {
        format!(
            "{}/v1/projects/{}/accounts{}",
            self.base_url,
            self.client.project_id(),
            suffix
        )
    }
}

/// Map an Identity Toolkit error message to a provider error
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be at least 6 characters`.
fn map_identity_error(operation: &str, status: u16, message: String, email: Option<&str>, uid: Option<&str>) -> InternalError {
    let (code, detail) = match message.split_once(" : ") {
        Some((code, detail)) => (code.trim(), detail.trim()),
        None => (message.trim(), ""),
    };

    match code {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => IdentityError::EmailAlreadyExists {
            email: email.unwrap_or_default().to_string(),
        }
        .into(),
        "INVALID_EMAIL" => IdentityError::InvalidEmail {
            email: email.unwrap_or_default().to_string(),
        }
        .into(),
        "WEAK_PASSWORD" => IdentityError::WeakPassword {
            reason: if detail.is_empty() { code.to_string() } else { detail.to_string() },
        }
        .into(),
        "USER_NOT_FOUND" => IdentityError::UserNotFound {
            uid: uid.unwrap_or_default().to_string(),
        }
        .into(),
        _ if (400..500).contains(&status) => IdentityError::Backend { message }.into(),
        _ => unexpected_status(operation, status, message),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn create_user(&self, identity: NewIdentity) -> Result<String, InternalError> {
        const OPERATION: &str = "firebase_create_user";

        let body = CreateAccountRequest {
            email: &identity.email,
            password: &identity.password,
            display_name: &identity.display_name,
            email_verified: identity.email_verified,
        };

        let request = self.client.request(Method::POST, &self.accounts_url("")).json(&body);
        let response = self.client.send(OPERATION, request).await?;

        if !response.status().is_success() {
            let (status, message) = error_details(response).await;
            return Err(map_identity_error(OPERATION, status, message, Some(&identity.email), None));
        }

        let created: CreateAccountResponse = decode_json(OPERATION, response).await?;
        Ok(created.local_id)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), InternalError> {
        const OPERATION: &str = "firebase_delete_user";

        let request = self
            .client
            .request(Method::POST, &self.accounts_url(":delete"))
            .json(&DeleteAccountRequest { local_id: uid });
        let response = self.client.send(OPERATION, request).await?;

        if !response.status().is_success() {
            let (status, message) = error_details(response).await;
            return Err(map_identity_error(OPERATION, status, message, None, Some(uid)));
        }

        Ok(())
    }

    async fn list_user_ids(&self) -> Result<Vec<String>, InternalError> {
        const OPERATION: &str = "firebase_list_users";

        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("nextPageToken", token.clone()));
            }

            let request = self
                .client
                .request(Method::GET, &self.accounts_url(":batchGet"))
                .query(&query);
            let response = self.client.send(OPERATION, request).await?;

            if !response.status().is_success() {
                let (status, message) = error_details(response).await;
                return Err(map_identity_error(OPERATION, status, message, None, None));
            }

            let page: BatchGetResponse = decode_json(OPERATION, response).await?;
            ids.extend(page.users.into_iter().map(|user| user.local_id));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(ids)
    }

    fn name(&self) -> &'static str {
        "firebase"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::errors::internal::HttpError;

    fn provider(server: &MockServer) -> FirebaseIdentityProvider {
        let client = FirebaseClient::new("demo", "test-token", Duration::from_secs(5)).unwrap();
        FirebaseIdentityProvider::new(Arc::new(client), server.uri())
    }

    fn new_identity() -> NewIdentity {
        NewIdentity {
            email: "jo@x.com".to_string(),
            password: "hunter22".to_string(),
            display_name: "Jo".to_string(),
            email_verified: false,
        }
    }

    fn google_error(status: u16, message: &str) -> ResponseTemplate {
        ResponseTemplate::new(status).set_body_json(json!({
            "error": { "code": status, "message": message, "errors": [] }
        }))
    }

    #[tokio::test]
    async fn creates_user_with_expected_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(json!({
                "email": "jo@x.com",
                "password": "hunter22",
                "displayName": "Jo",
                "emailVerified": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "identitytoolkit#SignupNewUserResponse",
                "localId": "fb-uid-1",
                "email": "jo@x.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uid = provider(&server).create_user(new_identity()).await.unwrap();
        assert_eq!(uid, "fb-uid-1");
    }

    #[tokio::test]
    async fn maps_email_exists() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts"))
            .respond_with(google_error(400, "EMAIL_EXISTS"))
            .mount(&server)
            .await;

        let result = provider(&server).create_user(new_identity()).await;
        match result {
            Err(InternalError::Identity(IdentityError::EmailAlreadyExists { email })) => {
                assert_eq!(email, "jo@x.com");
            }
            other => panic!("Expected EmailAlreadyExists, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn maps_weak_password_with_detail() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts"))
            .respond_with(google_error(400, "WEAK_PASSWORD : Password should be at least 6 characters"))
            .mount(&server)
            .await;

        let err = provider(&server).create_user(new_identity()).await.unwrap_err();
        assert!(err.to_string().contains("Password should be at least 6 characters"));
    }

    #[tokio::test]
    async fn delete_maps_user_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts:delete"))
            .and(body_json(json!({ "localId": "missing" })))
            .respond_with(google_error(400, "USER_NOT_FOUND"))
            .mount(&server)
            .await;

        let err = provider(&server).delete_user("missing").await.unwrap_err();
        assert!(err.is_identity_not_found());
    }

    #[tokio::test]
    async fn delete_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts:delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "identitytoolkit#DeleteAccountResponse"
            })))
            .expect(1)
            .mount(&server)
            .await;

        provider(&server).delete_user("fb-uid-1").await.unwrap();
    }

    #[tokio::test]
    async fn server_errors_are_http_status_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts:delete"))
            .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
            .mount(&server)
            .await;

        let err = provider(&server).delete_user("fb-uid-1").await.unwrap_err();
        match err {
            InternalError::Http(HttpError::Status { status, message, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "backend unavailable");
            }
            other => panic!("Expected Http status error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn lists_users_across_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/demo/accounts:batchGet"))
            .and(query_param("nextPageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "localId": "c" }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/projects/demo/accounts:batchGet"))
            .and(query_param("maxResults", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "localId": "a" }, { "localId": "b" }],
                "nextPageToken": "page-2"
            })))
            .mount(&server)
            .await;

        let ids = provider(&server).list_user_ids().await.unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
