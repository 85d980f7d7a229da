// External service integrations
pub mod firebase;
