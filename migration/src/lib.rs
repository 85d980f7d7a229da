pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_identities;
mod m20250301_000002_create_staff_profiles;
mod m20250301_000003_create_audit_events;

/// Schema for the local identity provider database
pub struct IdentityMigrator;

#[async_trait::async_trait]
impl MigratorTrait for IdentityMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_identities::Migration),
        ]
    }
}

/// Schema for the staff profile database
pub struct ProfileMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ProfileMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000002_create_staff_profiles::Migration),
        ]
    }
}

pub struct AuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000003_create_audit_events::Migration),
        ]
    }
}
