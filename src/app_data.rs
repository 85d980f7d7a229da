use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{BootstrapSettings, DatabaseConnections, SecretManager, StaffBackend};
use crate::errors::InternalError;
use crate::integrations::firebase::{FirebaseClient, FirebaseIdentityProvider, FirestoreProfileStore};
use crate::providers::{CryptoProvider, IdentityProvider, LocalIdentityProvider, TokenProvider};
use crate::stores::{AuditStore, ProfileStore, SqlProfileStore};

/// Centralized application data following the main-owned collaborators pattern
///
/// Everything is created once in main.rs and shared across coordinators and
/// endpoints. The identity provider and profile store are chosen here from the
/// configured backend; nothing downstream knows which one is in use.
///
/// # Architecture
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ audit_store / audit_logger (audit database)
///   ├─ crypto_provider, token_provider (secrets)
///   ├─ identity_provider (LocalIdentityProvider | FirebaseIdentityProvider)
///   └─ profile_store (SqlProfileStore | FirestoreProfileStore)
///   ↓ wrapped in Arc<AppData>
///   ├─ StaffCoordinator::new(app_data)
///   └─ ReconciliationCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub backend: StaffBackend,
    pub connections: DatabaseConnections,
    pub secret_manager: Arc<SecretManager>,
    pub audit_store: Arc<AuditStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub profile_store: Arc<dyn ProfileStore>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// Database connections should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the selected backend is missing a connection,
    /// setting or secret it needs, or when the HTTP client cannot be built
    pub fn init(
        bootstrap_settings: &BootstrapSettings,
        connections: DatabaseConnections,
        secret_manager: Arc<SecretManager>,
    ) -> Result<Self, InternalError> {
        let backend = bootstrap_settings.backend();
        tracing::info!("Initializing AppData with {} backend...", backend.as_str());

        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));
        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.password_pepper()));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));

        let (identity_provider, profile_store): (Arc<dyn IdentityProvider>, Arc<dyn ProfileStore>) = match backend {
            StaffBackend::Local => {
                let identity_db = connections
                    .identity
                    .clone()
                    .ok_or_else(|| missing("identity database connection"))?;
                let profile_db = connections
                    .profile
                    .clone()
                    .ok_or_else(|| missing("profile database connection"))?;

                (
                    Arc::new(LocalIdentityProvider::new(identity_db, crypto_provider.clone())),
                    Arc::new(SqlProfileStore::new(profile_db)),
                )
            }
            StaffBackend::Firebase => {
                let firebase = bootstrap_settings
                    .firebase()
                    .ok_or_else(|| missing("firebase settings"))?;
                let access_token = secret_manager
                    .firebase_access_token()
                    .ok_or_else(|| missing("FIREBASE_ACCESS_TOKEN"))?;

                let client = Arc::new(FirebaseClient::new(
                    firebase.project_id.clone(),
                    access_token,
                    bootstrap_settings.http_timeout(),
                )?);

                (
                    Arc::new(FirebaseIdentityProvider::new(client.clone(), firebase.auth_base_url.clone())),
                    Arc::new(FirestoreProfileStore::new(
                        client,
                        firebase.firestore_base_url.clone(),
                        firebase.collection.clone(),
                    )),
                )
            }
        };

        tracing::debug!(
            identity = identity_provider.name(),
            profiles = profile_store.name(),
            "Collaborators created"
        );
        tracing::info!("AppData initialization complete");

        Ok(Self {
            backend,
            connections,
            secret_manager,
            audit_store,
            audit_logger,
            crypto_provider,
            token_provider,
            identity_provider,
            profile_store,
        })
    }
}

fn missing(what: &str) -> InternalError {
    InternalError::parse("app_data", format!("{} is required for the selected backend", what))
}
