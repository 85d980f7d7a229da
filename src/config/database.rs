use migration::{AuditMigrator, IdentityMigrator, MigratorTrait, ProfileMigrator};
use sea_orm::{Database, DatabaseConnection};

use crate::config::{BootstrapSettings, StaffBackend};
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connections for the local databases
///
/// Identity and profile data are kept in separate connections so that no
/// transaction can span them. Both are absent when the firebase backend is
/// selected; the audit database is always local.
pub struct DatabaseConnections {
    pub identity: Option<DatabaseConnection>,
    pub profile: Option<DatabaseConnection>,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to every database named in the bootstrap settings
    ///
    /// Does NOT run migrations - call `migrate()` separately.
    pub async fn connect(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        let (identity, profile) = match bootstrap_settings.backend() {
            StaffBackend::Local => (
                Some(connect("connect_identity_database", bootstrap_settings.identity_database_url()).await?),
                Some(connect("connect_profile_database", bootstrap_settings.profile_database_url()).await?),
            ),
            StaffBackend::Firebase => (None, None),
        };
        let audit = connect("connect_audit_database", bootstrap_settings.audit_database_url()).await?;

        Ok(Self {
            identity,
            profile,
            audit,
        })
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        if let Some(identity) = &self.identity {
            migrate_identity_database(identity).await?;
        }
        if let Some(profile) = &self.profile {
            migrate_profile_database(profile).await?;
        }
        migrate_audit_database(&self.audit).await?;

        Ok(())
    }
}

async fn connect(operation: &str, url: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(url)
        .await
        .map_err(|e| InternalError::database(operation, e))?;

    tracing::debug!("Connected to database: {}", url);

    Ok(db)
}

/// Run migrations on the identity database
pub async fn migrate_identity_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    IdentityMigrator::up(db, None)
        .await
        .map_err(|source| DatabaseError::Migration {
            database: "identity".to_string(),
            source,
        })?;

    tracing::debug!("Identity database migrations completed");

    Ok(())
}

/// Run migrations on the profile database
pub async fn migrate_profile_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    ProfileMigrator::up(db, None)
        .await
        .map_err(|source| DatabaseError::Migration {
            database: "profile".to_string(),
            source,
        })?;

    tracing::debug!("Profile database migrations completed");

    Ok(())
}

/// Run migrations on the audit database
pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|source| DatabaseError::Migration {
            database: "audit".to_string(),
            source,
        })?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
