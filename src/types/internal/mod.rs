// Internal types - never serialized over the API directly
pub mod audit;
pub mod auth;
pub mod context;
pub mod reconcile;
pub mod staff;
