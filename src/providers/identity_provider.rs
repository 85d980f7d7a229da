use async_trait::async_trait;

use crate::errors::InternalError;
use crate::types::internal::staff::NewIdentity;

/// Authentication identity backend for staff accounts
///
/// Implementations own credential storage and enforce their own rules on email
/// format, uniqueness, and password strength.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an identity and return its unique id
    async fn create_user(&self, identity: NewIdentity) -> Result<String, InternalError>;

    /// Delete an identity
    ///
    /// # Errors
    /// * `IdentityError::UserNotFound` - No identity exists for `uid`
    async fn delete_user(&self, uid: &str) -> Result<(), InternalError>;

    /// Ids of every identity known to the provider
    async fn list_user_ids(&self) -> Result<Vec<String>, InternalError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
