use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode, Url};
use serde_json::json;

use crate::errors::InternalError;
use crate::errors::internal::{HttpError, ProfileError};
use crate::stores::ProfileStore;
use crate::types::internal::staff::{NewStaffProfile, StaffProfile, is_valid_uid};

use super::client::{decode_json, error_details, unexpected_status, FirebaseClient};
use super::types::{Document, ListDocumentsResponse};

const LIST_PAGE_SIZE: &str = "300";

/// Profile store backed by the Cloud Firestore REST API
///
/// Documents live at `{collection}/{uid}`. Timestamps are written with
/// `REQUEST_TIME` server transforms so the store, not the caller, assigns them.
pub struct FirestoreProfileStore {
    client: Arc<FirebaseClient>,
    base_url: String,
    collection: String,
}

impl FirestoreProfileStore {
    pub fn new(client: Arc<FirebaseClient>, base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            collection: collection.into(),
        }
    }

    /// `projects/{p}/databases/(default)/documents`
    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.client.project_id())
    }

    fn document_name(&self, uid: &str) -> Result<String, InternalError> {
        if !is_valid_uid(uid) {
            return Err(ProfileError::InvalidUid { uid: uid.to_string() }.into());
        }
        Ok(format!("{}/{}/{}", self.database_path(), self.collection, uid))
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/v1/{}", self.base_url, resource)
    }

    /// REST URL of the document for `uid`, with the uid appended as one encoded segment
    fn document_url(&self, operation: &str, uid: &str) -> Result<Url, InternalError> {
        if !is_valid_uid(uid) {
            return Err(ProfileError::InvalidUid { uid: uid.to_string() }.into());
        }

        let collection_url = self.url(&format!("{}/{}", self.database_path(), self.collection));
        let mut url = Url::parse(&collection_url)
            .map_err(|e| HttpError::decode(operation, format!("invalid Firestore URL {}: {}", collection_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| HttpError::decode(operation, format!("Firestore URL {} cannot take a path", collection_url)))?
            .push(uid);

        Ok(url)
    }

    fn parse_timestamp(uid: &str, field: &str, value: Option<&str>) -> Result<DateTime<Utc>, InternalError> {
        let raw = value.ok_or_else(|| ProfileError::Malformed {
            uid: uid.to_string(),
            reason: format!("missing {}", field),
        })?;

        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| {
                ProfileError::Malformed {
                    uid: uid.to_string(),
                    reason: format!("{} is not RFC 3339: {}", field, e),
                }
                .into()
            })
    }

    fn to_profile(document: &Document) -> Result<StaffProfile, InternalError> {
        let uid = document.id().to_string();
        let required = |field: &str| {
            document
                .string(field)
                .map(str::to_string)
                .ok_or_else(|| ProfileError::Malformed {
                    uid: uid.clone(),
                    reason: format!("missing {}", field),
                })
        };

        let email = required("email")?;
        let display_name = required("displayName")?;
        let role = required("role")?;
        let department = required("department")?;

        let created_at = Self::parse_timestamp(
            &uid,
            "createdAt",
            document.timestamp("createdAt").or(document.create_time.as_deref()),
        )?;
        let updated_at = Self::parse_timestamp(
            &uid,
            "updatedAt",
            document.timestamp("updatedAt").or(document.update_time.as_deref()),
        )?;

        Ok(StaffProfile {
            email,
            display_name,
            role,
            department,
            is_disabled: document.boolean("isDisabled").unwrap_or(false),
            created_at,
            updated_at,
            uid,
        })
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn set_profile(&self, profile: NewStaffProfile) -> Result<(), InternalError> {
        const OPERATION: &str = "firestore_set_profile";

        let name = self.document_name(&profile.uid)?;

        // Full-document update without an update mask replaces the document
        let body = json!({
            "writes": [{
                "update": {
                    "name": name,
                    "fields": {
                        "uid": { "stringValue": profile.uid },
                        "email": { "stringValue": profile.email },
                        "displayName": { "stringValue": profile.display_name },
                        "role": { "stringValue": profile.role },
                        "department": { "stringValue": profile.department },
                        "isDisabled": { "booleanValue": profile.is_disabled }
                    }
                },
                "updateTransforms": [
                    { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" },
                    { "fieldPath": "updatedAt", "setToServerValue": "REQUEST_TIME" }
                ]
            }]
        });

        let url = self.url(&format!("{}:commit", self.database_path()));
        let request = self.client.request(Method::POST, &url).json(&body);
        let response = self.client.send(OPERATION, request).await?;

        if !response.status().is_success() {
            let (status, message) = error_details(response).await;
            return Err(unexpected_status(OPERATION, status, message));
        }

        Ok(())
    }

    async fn delete_profile(&self, uid: &str) -> Result<(), InternalError> {
        const OPERATION: &str = "firestore_delete_profile";

        let url = self.document_url(OPERATION, uid)?;
        let request = self.client.request(Method::DELETE, url.as_str());
        let response = self.client.send(OPERATION, request).await?;

        // Firestore answers 200 for a missing document; an emulator may answer 404
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let (status, message) = error_details(response).await;
        Err(unexpected_status(OPERATION, status, message))
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<StaffProfile>, InternalError> {
        const OPERATION: &str = "firestore_get_profile";

        let url = self.document_url(OPERATION, uid)?;
        let request = self.client.request(Method::GET, url.as_str());
        let response = self.client.send(OPERATION, request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let (status, message) = error_details(response).await;
            return Err(unexpected_status(OPERATION, status, message));
        }

        let document: Document = decode_json(OPERATION, response).await?;
        Self::to_profile(&document).map(Some)
    }

    async fn list_profile_ids(&self) -> Result<Vec<String>, InternalError> {
        const OPERATION: &str = "firestore_list_profiles";

        let url = self.url(&format!("{}/{}", self.database_path(), self.collection));
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("pageSize", LIST_PAGE_SIZE.to_string()),
                ("mask.fieldPaths", "uid".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let request = self.client.request(Method::GET, &url).query(&query);
            let response = self.client.send(OPERATION, request).await?;

            if !response.status().is_success() {
                let (status, message) = error_details(response).await;
                return Err(unexpected_status(OPERATION, status, message));
            }

            let page: ListDocumentsResponse = decode_json(OPERATION, response).await?;
            ids.extend(page.documents.iter().map(|doc| doc.id().to_string()));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(ids)
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}
