use async_trait::async_trait;

use crate::errors::InternalError;
use crate::types::internal::staff::{NewStaffProfile, StaffProfile};

/// Document store holding one staff profile per identity uid
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write the profile keyed by `profile.uid`, replacing any existing document
    ///
    /// `createdAt` and `updatedAt` are assigned by the store at write time.
    async fn set_profile(&self, profile: NewStaffProfile) -> Result<(), InternalError>;

    /// Delete the profile for `uid`; deleting a missing document succeeds
    async fn delete_profile(&self, uid: &str) -> Result<(), InternalError>;

    async fn get_profile(&self, uid: &str) -> Result<Option<StaffProfile>, InternalError>;

    /// Ids of every stored profile document
    async fn list_profile_ids(&self) -> Result<Vec<String>, InternalError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
