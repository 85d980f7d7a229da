// Database entities - SeaORM models
pub mod audit_event;
pub mod identity;
pub mod staff_profile;
