// Providers layer - Work performers
//
// Providers perform the actual work (hashing, token handling, identity
// management) that coordinators orchestrate.

pub mod crypto_provider;
pub mod identity_provider;
pub mod local_identity_provider;
pub mod token_provider;

pub use crypto_provider::CryptoProvider;
pub use identity_provider::IdentityProvider;
pub use local_identity_provider::LocalIdentityProvider;
pub use token_provider::TokenProvider;
