use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::IdentityError;
use crate::providers::CryptoProvider;
use crate::providers::identity_provider::IdentityProvider;
use crate::types::db::identity::{self, ActiveModel, Entity as Identity};
use crate::types::internal::staff::NewIdentity;

/// Shortest password the local backend accepts
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Identity provider backed by the local `identities` table
pub struct LocalIdentityProvider {
    db: DatabaseConnection,
    crypto_provider: Arc<CryptoProvider>,
}

impl LocalIdentityProvider {
    pub fn new(db: DatabaseConnection, crypto_provider: Arc<CryptoProvider>) -> Self {
        Self { db, crypto_provider }
    }

    /// Verify an email/password pair against the stored hash
    ///
    /// Unknown emails and disabled identities return `Ok(None)`.
    #[cfg(test)]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<String>, InternalError> {
        let record = Identity::find()
            .filter(identity::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_identity_by_email", e))?;

        let Some(record) = record.filter(|r| !r.disabled) else {
            return Ok(None);
        };

        let matches = self
            .crypto_provider
            .verify_password(&record.password_hash, password)
            .await?;

        Ok(matches.then_some(record.uid))
    }

    async fn email_in_use(&self, email: &str) -> Result<bool, InternalError> {
        let existing = Identity::find()
            .filter(identity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_identity_by_email", e))?;

        Ok(existing.is_some())
    }
}

/// Minimal structural email check: `local@domain.tld`, no whitespace
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_user(&self, new_identity: NewIdentity) -> Result<String, InternalError> {
        let email = new_identity.email.trim().to_lowercase();

        if !is_valid_email(&email) {
            return Err(IdentityError::InvalidEmail { email }.into());
        }

        if new_identity.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword {
                reason: format!("Password should be at least {} characters", MIN_PASSWORD_LENGTH),
            }
            .into());
        }

        if self.email_in_use(&email).await? {
            return Err(IdentityError::EmailAlreadyExists { email }.into());
        }

        let password_hash = self.crypto_provider.hash_password(&new_identity.password).await?;
        let uid = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        let record = ActiveModel {
            uid: Set(uid.clone()),
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            display_name: Set(new_identity.display_name),
            email_verified: Set(new_identity.email_verified),
            disabled: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await.map_err(|e| {
            // Concurrent create with the same email loses on the unique index
            if e.to_string().contains("UNIQUE") {
                InternalError::from(IdentityError::EmailAlreadyExists { email: email.clone() })
            } else {
                InternalError::database("insert_identity", e)
            }
        })?;

        tracing::debug!(uid = %uid, "Created local identity");

        Ok(uid)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), InternalError> {
        let result = Identity::delete_by_id(uid.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_identity", e))?;

        if result.rows_affected == 0 {
            return Err(IdentityError::UserNotFound { uid: uid.to_string() }.into());
        }

        tracing::debug!(uid = %uid, "Deleted local identity");

        Ok(())
    }

    async fn list_user_ids(&self) -> Result<Vec<String>, InternalError> {
        Identity::find()
            .select_only()
            .column(identity::Column::Uid)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_identity_ids", e))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
