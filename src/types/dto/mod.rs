// API request/response models
pub mod common;
pub mod staff;
