use std::fmt;
use std::sync::Arc;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, StaffBackend};

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
    firebase_access_token: Option<String>,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init(backend: StaffBackend) -> Result<Self, SecretError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment), backend)
    }

    /// Load and validate all secrets from the given environment provider
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or fails validation.
    /// `FIREBASE_ACCESS_TOKEN` is only required for the firebase backend.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
        backend: StaffBackend,
    ) -> Result<Self, SecretError> {
        let env = env_provider.as_ref();
        let jwt_secret = Self::load_secret(env, &Self::jwt_config())?;
        let password_pepper = Self::load_secret(env, &Self::pepper_config())?;

        let firebase_token =
            Self::load_secret(env, &Self::firebase_token_config(backend == StaffBackend::Firebase))?;
        let firebase_access_token = (!firebase_token.is_empty()).then_some(firebase_token);

        Ok(Self {
            jwt_secret,
            password_pepper,
            firebase_access_token,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "JWT_SECRET".to_string(),
        })
        .required(true)
        .min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "PASSWORD_PEPPER".to_string(),
        })
        .required(true)
        .min_length(16)
    }

    /// OAuth2 bearer token for the Firebase REST APIs
    fn firebase_token_config(required: bool) -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "FIREBASE_ACCESS_TOKEN".to_string(),
        })
        .required(required)
    }

    /// Get the JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn firebase_access_token(&self) -> Option<&str> {
        self.firebase_access_token.as_deref()
    }

    /// Load a secret based on its configuration
    ///
    /// An unset optional secret loads as an empty string.
    pub(crate) fn load_secret(
        env: &(dyn EnvironmentProvider + Send + Sync),
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let name = config.secret_type.name();
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field(
                "firebase_access_token",
                &self.firebase_access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = 2 + usize::from(self.firebase_access_token.is_some());
        write!(f, "SecretManager {{ secrets_loaded: {} }}", loaded)
    }
}
