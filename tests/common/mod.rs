// Common test utilities for integration tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assistly_backend::app_data::AppData;
use assistly_backend::config::{BootstrapSettings, DatabaseConnections, EnvironmentProvider, SecretManager};

pub const TEST_JWT_SECRET: &str = "integration-jwt-secret-at-least-32-chars";
pub const TEST_PEPPER: &str = "integration-pepper-16";

/// Environment provider backed by a fixed map
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self {
            vars: vars
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Local-backend environment with every database in memory
pub fn local_memory_env() -> Arc<dyn EnvironmentProvider + Send + Sync> {
    Arc::new(StaticEnvironment::new(&[
        ("IDENTITY_DATABASE_URL", "sqlite::memory:"),
        ("PROFILE_DATABASE_URL", "sqlite::memory:"),
        ("AUDIT_DATABASE_URL", "sqlite::memory:"),
        ("STAFF_BACKEND", "local"),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PASSWORD_PEPPER", TEST_PEPPER),
    ]))
}

/// Build AppData the way main does, against in-memory databases
pub async fn setup_local_app_data() -> Arc<AppData> {
    let env = local_memory_env();
    let bootstrap_settings = BootstrapSettings::from_env_provider(env.clone()).expect("bootstrap settings");
    let secret_manager = Arc::new(
        SecretManager::from_env_provider(env, bootstrap_settings.backend()).expect("secrets"),
    );

    let connections = DatabaseConnections::connect(&bootstrap_settings)
        .await
        .expect("Failed to connect test databases");
    connections.migrate().await.expect("Failed to run migrations");

    Arc::new(AppData::init(&bootstrap_settings, connections, secret_manager).expect("app data"))
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
