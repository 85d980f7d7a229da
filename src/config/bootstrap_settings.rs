use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EnvironmentProvider;
use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;

/// Which collaborator pair backs the staff lifecycle service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffBackend {
    /// SQLite identity table + SQLite profile table
    Local,
    /// Firebase Auth + Cloud Firestore over REST
    Firebase,
}

impl StaffBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Firebase => "firebase",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "firebase" => Some(Self::Firebase),
            _ => None,
        }
    }

    fn validate(value: &str) -> Result<(), String> {
        Self::parse(value)
            .map(|_| ())
            .ok_or_else(|| format!("Expected 'local' or 'firebase', got '{}'", value))
    }
}

/// Endpoints used when `STAFF_BACKEND=firebase`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseSettings {
    pub project_id: String,
    pub auth_base_url: String,
    pub firestore_base_url: String,
    pub collection: String,
}

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    identity_database_url: String,
    profile_database_url: String,
    audit_database_url: String,
    server_host: String,
    server_port: u16,
    backend: StaffBackend,
    firebase: Option<FirebaseSettings>,
    http_timeout: Duration,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let identity_database_url = ConfigSpec::new(env_provider.clone())
            .env_override("IDENTITY_DATABASE_URL")
            .default_value("sqlite://identity.db?mode=rwc")
            .min_length(1)
            .load_setting_with_source()?
            .value;

        let profile_database_url = ConfigSpec::new(env_provider.clone())
            .env_override("PROFILE_DATABASE_URL")
            .default_value("sqlite://profiles.db?mode=rwc")
            .min_length(1)
            .load_setting_with_source()?
            .value;

        let audit_database_url = ConfigSpec::new(env_provider.clone())
            .env_override("AUDIT_DATABASE_URL")
            .default_value("sqlite://audit.db?mode=rwc")
            .min_length(1)
            .load_setting_with_source()?
            .value;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load_setting_with_source()?
            .value;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .validator(|value| ConfigSpec::validate_port_range(value, 1, 65535))
            .load_setting_with_source()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let backend_value = ConfigSpec::new(env_provider.clone())
            .env_override("STAFF_BACKEND")
            .default_value("local")
            .validator(StaffBackend::validate)
            .load_setting_with_source()?
            .value;
        let backend = StaffBackend::parse(&backend_value).ok_or_else(|| ApplicationError::ParseError {
            setting_name: "STAFF_BACKEND".to_string(),
            error: format!("Unknown backend '{}'", backend_value),
        })?;

        let timeout_value = ConfigSpec::new(env_provider.clone())
            .env_override("HTTP_TIMEOUT_SECS")
            .default_value("10")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 300))
            .load_setting_with_source()?
            .value;
        let http_timeout = Duration::from_secs(ConfigSpec::parse_u64(&timeout_value, "HTTP_TIMEOUT_SECS")?);

        let firebase = match backend {
            StaffBackend::Local => None,
            StaffBackend::Firebase => Some(Self::load_firebase_settings(env_provider)?),
        };

        Ok(Self {
            identity_database_url,
            profile_database_url,
            audit_database_url,
            server_host,
            server_port,
            backend,
            firebase,
            http_timeout,
        })
    }

    fn load_firebase_settings(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<FirebaseSettings, ApplicationError> {
        let project_id = ConfigSpec::new(env_provider.clone())
            .env_override("FIREBASE_PROJECT_ID")
            .load_setting_with_source()?
            .value;
        if project_id.trim().is_empty() {
            return Err(ApplicationError::MissingSetting {
                setting_name: "FIREBASE_PROJECT_ID".to_string(),
                context: "when STAFF_BACKEND=firebase".to_string(),
            });
        }

        let auth_base_url = ConfigSpec::new(env_provider.clone())
            .env_override("FIREBASE_AUTH_BASE_URL")
            .default_value("https://identitytoolkit.googleapis.com")
            .validator(ConfigSpec::validate_base_url)
            .load_setting_with_source()?
            .value;

        let firestore_base_url = ConfigSpec::new(env_provider.clone())
            .env_override("FIRESTORE_BASE_URL")
            .default_value("https://firestore.googleapis.com")
            .validator(ConfigSpec::validate_base_url)
            .load_setting_with_source()?
            .value;

        let collection = ConfigSpec::new(env_provider)
            .env_override("STAFF_COLLECTION")
            .default_value("staff")
            .min_length(1)
            .load_setting_with_source()?
            .value;

        Ok(FirebaseSettings {
            project_id,
            auth_base_url,
            firestore_base_url,
            collection,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn identity_database_url(&self) -> &str {
        &self.identity_database_url
    }

    pub fn profile_database_url(&self) -> &str {
        &self.profile_database_url
    }

    pub fn audit_database_url(&self) -> &str {
        &self.audit_database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn backend(&self) -> StaffBackend {
        self.backend
    }

    /// Present only when the firebase backend is selected
    pub fn firebase(&self) -> Option<&FirebaseSettings> {
        self.firebase.as_ref()
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("identity_database_url", &self.identity_database_url)
            .field("profile_database_url", &self.profile_database_url)
            .field("audit_database_url", &self.audit_database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("backend", &self.backend)
            .field("firebase", &self.firebase)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use std::collections::HashMap;

    fn create_test_env(vars: &[(&str, &str)]) -> Arc<MockEnvironment> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Arc::new(MockEnvironment::new(vars))
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = BootstrapSettings::from_env_provider(create_test_env(&[])).unwrap();

        assert_eq!(settings.identity_database_url(), "sqlite://identity.db?mode=rwc");
        assert_eq!(settings.profile_database_url(), "sqlite://profiles.db?mode=rwc");
        assert_eq!(settings.audit_database_url(), "sqlite://audit.db?mode=rwc");
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.backend(), StaffBackend::Local);
        assert!(settings.firebase().is_none());
        assert_eq!(settings.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let env = create_test_env(&[
            ("IDENTITY_DATABASE_URL", "sqlite://id-test.db"),
            ("PROFILE_DATABASE_URL", "sqlite://profile-test.db"),
            ("AUDIT_DATABASE_URL", "sqlite://audit-test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("HTTP_TIMEOUT_SECS", "3"),
        ]);

        let settings = BootstrapSettings::from_env_provider(env).unwrap();

        assert_eq!(settings.identity_database_url(), "sqlite://id-test.db");
        assert_eq!(settings.profile_database_url(), "sqlite://profile-test.db");
        assert_eq!(settings.audit_database_url(), "sqlite://audit-test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.http_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_empty_identity_database_url_fails_validation() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("IDENTITY_DATABASE_URL", "")]));

        match result.unwrap_err() {
            ApplicationError::InvalidSetting { setting_name, reason } => {
                assert_eq!(setting_name, "IDENTITY_DATABASE_URL");
                assert!(reason.contains("must be at least 1 characters long"));
            }
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_port() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("PORT", "0")]));

        match result.unwrap_err() {
            ApplicationError::InvalidSetting { setting_name, reason } => {
                assert_eq!(setting_name, "PORT");
                assert!(reason.contains("outside valid range"));
            }
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }

        assert!(BootstrapSettings::from_env_provider(create_test_env(&[("PORT", "65536")])).is_err());
        assert!(BootstrapSettings::from_env_provider(create_test_env(&[("PORT", "abc")])).is_err());
    }

    #[test]
    fn test_invalid_host() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("HOST", "300.300.300.300")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("STAFF_BACKEND", "mongo")]));

        match result.unwrap_err() {
            ApplicationError::InvalidSetting { setting_name, .. } => {
                assert_eq!(setting_name, "STAFF_BACKEND");
            }
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_firebase_backend_requires_project_id() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("STAFF_BACKEND", "firebase")]));

        match result.unwrap_err() {
            ApplicationError::MissingSetting { setting_name, .. } => {
                assert_eq!(setting_name, "FIREBASE_PROJECT_ID");
            }
            other => panic!("Expected MissingSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_firebase_backend_settings() {
        let env = create_test_env(&[
            ("STAFF_BACKEND", "Firebase"),
            ("FIREBASE_PROJECT_ID", "assistly-prod"),
            ("FIREBASE_AUTH_BASE_URL", "http://127.0.0.1:9099/identitytoolkit.googleapis.com"),
        ]);

        let settings = BootstrapSettings::from_env_provider(env).unwrap();
        let firebase = settings.firebase().unwrap();

        assert_eq!(settings.backend(), StaffBackend::Firebase);
        assert_eq!(firebase.project_id, "assistly-prod");
        assert_eq!(firebase.auth_base_url, "http://127.0.0.1:9099/identitytoolkit.googleapis.com");
        assert_eq!(firebase.firestore_base_url, "https://firestore.googleapis.com");
        assert_eq!(firebase.collection, "staff");
    }

    #[test]
    fn test_firebase_base_url_validated() {
        let env = create_test_env(&[
            ("STAFF_BACKEND", "firebase"),
            ("FIREBASE_PROJECT_ID", "p"),
            ("FIRESTORE_BASE_URL", "firestore.googleapis.com"),
        ]);

        assert!(BootstrapSettings::from_env_provider(env).is_err());
    }

    #[test]
    fn test_bootstrap_settings_debug_format() {
        let settings = BootstrapSettings::from_env_provider(create_test_env(&[("HOST", "localhost")])).unwrap();
        let debug_str = format!("{:?}", settings);

        assert!(debug_str.contains("identity_database_url"));
        assert!(debug_str.contains("localhost"));
        assert!(debug_str.contains("Local"));
    }
}
