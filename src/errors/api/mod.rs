// API-facing error types
pub mod staff;

pub use staff::{StaffApiError, StaffErrorResponse};
