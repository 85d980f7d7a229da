// Errors layer - Error type definitions
pub mod api;
pub mod internal;
pub mod staff;

// Re-exports for convenience
pub use api::StaffApiError;
pub use internal::InternalError;
pub use staff::{StaffError, StaffErrorKind};
