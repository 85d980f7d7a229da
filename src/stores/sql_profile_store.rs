use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, Set};

use crate::errors::InternalError;
use crate::errors::internal::ProfileError;
use crate::stores::profile_store::ProfileStore;
use crate::types::db::staff_profile::{self, ActiveModel, Entity as StaffProfileEntity};
use crate::types::internal::staff::{NewStaffProfile, StaffProfile};

/// Profile store backed by the local `staff_profiles` table
pub struct SqlProfileStore {
    db: DatabaseConnection,
}

impl SqlProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: staff_profile::Model) -> Result<StaffProfile, InternalError> {
        let timestamp = |millis: i64, field: &str| {
            DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| ProfileError::Malformed {
                uid: model.uid.clone(),
                reason: format!("{} out of range: {}", field, millis),
            })
        };

        let created_at = timestamp(model.created_at, "createdAt")?;
        let updated_at = timestamp(model.updated_at, "updatedAt")?;

        Ok(StaffProfile {
            uid: model.uid,
            email: model.email,
            display_name: model.display_name,
            role: model.role,
            department: model.department,
            is_disabled: model.is_disabled,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl ProfileStore for SqlProfileStore {
    async fn set_profile(&self, profile: NewStaffProfile) -> Result<(), InternalError> {
        let now = Utc::now().timestamp_millis();
        let uid = profile.uid.clone();

        let model = ActiveModel {
            uid: Set(profile.uid),
            email: Set(profile.email),
            display_name: Set(profile.display_name),
            role: Set(profile.role),
            department: Set(profile.department),
            is_disabled: Set(profile.is_disabled),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Overwrite semantics: every column is replaced on conflict
        StaffProfileEntity::insert(model)
            .on_conflict(
                OnConflict::column(staff_profile::Column::Uid)
                    .update_columns([
                        staff_profile::Column::Email,
                        staff_profile::Column::DisplayName,
                        staff_profile::Column::Role,
                        staff_profile::Column::Department,
                        staff_profile::Column::IsDisabled,
                        staff_profile::Column::CreatedAt,
                        staff_profile::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("set_profile", e))?;

        tracing::debug!(uid = %uid, "Wrote staff profile");

        Ok(())
    }

    async fn delete_profile(&self, uid: &str) -> Result<(), InternalError> {
        let result = StaffProfileEntity::delete_by_id(uid.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_profile", e))?;

        tracing::debug!(uid = %uid, rows = result.rows_affected, "Deleted staff profile");

        Ok(())
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<StaffProfile>, InternalError> {
        StaffProfileEntity::find_by_id(uid.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_profile", e))?
            .map(Self::to_domain)
            .transpose()
    }

    async fn list_profile_ids(&self) -> Result<Vec<String>, InternalError> {
        StaffProfileEntity::find()
            .select_only()
            .column(staff_profile::Column::Uid)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_profile_ids", e))
    }

    fn name(&self) -> &'static str {
        "sql"
    }
}
