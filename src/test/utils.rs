// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{AuditMigrator, IdentityMigrator, MigratorTrait, ProfileMigrator};
use sea_orm::{Database, DatabaseConnection};

use crate::audit::AuditLogger;
use crate::config::{MockEnvironment, SecretManager, StaffBackend};
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::AuditStore;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

async fn memory_db() -> DatabaseConnection {
    Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub async fn setup_identity_db() -> DatabaseConnection {
    let db = memory_db().await;
    IdentityMigrator::up(&db, None)
        .await
        .expect("Failed to run identity migrations");
    db
}

pub async fn setup_profile_db() -> DatabaseConnection {
    let db = memory_db().await;
    ProfileMigrator::up(&db, None)
        .await
        .expect("Failed to run profile migrations");
    db
}

pub async fn setup_audit_db() -> DatabaseConnection {
    let db = memory_db().await;
    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");
    db
}

/// Audit logger writing to a fresh in-memory database
pub async fn setup_audit_logger() -> Arc<AuditLogger> {
    let audit_store = Arc::new(AuditStore::new(setup_audit_db().await));
    Arc::new(AuditLogger::new(audit_store))
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    let env = MockEnvironment::empty()
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", TEST_PEPPER);

    Arc::new(SecretManager::from_env_provider(Arc::new(env), StaffBackend::Local).expect("test secrets"))
}

pub fn test_crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(CryptoProvider::new(TEST_PEPPER))
}

pub fn test_token_provider() -> Arc<TokenProvider> {
    Arc::new(TokenProvider::new(test_secret_manager()))
}
