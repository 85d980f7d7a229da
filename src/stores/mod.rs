// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod profile_store;
pub mod sql_profile_store;

pub use audit_store::AuditStore;
pub use profile_store::ProfileStore;
pub use sql_profile_store::SqlProfileStore;
