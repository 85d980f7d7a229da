//! Firebase Auth and Cloud Firestore over their REST APIs
//!
//! Both adapters share one [`FirebaseClient`] which carries the project id,
//! the OAuth2 access token, and the configured request timeout.

mod auth;
mod client;
mod firestore;
mod types;

pub use auth::FirebaseIdentityProvider;
pub use client::FirebaseClient;
pub use firestore::FirestoreProfileStore;
