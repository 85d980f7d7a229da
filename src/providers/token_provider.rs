use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::TokenError;
use crate::types::internal::auth::Claims;

/// Issues and validates the HS256 bearer tokens that guard the staff endpoints
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    /// Issue an admin token for an operator
    ///
    /// # Arguments
    /// * `subject` - Operator identifier recorded as `sub` and used as audit actor
    /// * `ttl_minutes` - Lifetime of the token
    ///
    /// # Returns
    /// * `(String, Claims)` - Encoded JWT and the claims it carries
    pub fn issue_admin_token(&self, subject: &str, ttl_minutes: i64) -> Result<(String, Claims), InternalError> {
        if subject.trim().is_empty() {
            return Err(TokenError::Issuance {
                reason: "subject must not be empty".to_string(),
            }
            .into());
        }
        if ttl_minutes <= 0 {
            return Err(TokenError::Issuance {
                reason: format!("ttl must be positive, got {} minutes", ttl_minutes),
            }
            .into());
        }

        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            is_admin: true,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| TokenError::Issuance { reason: e.to_string() })?;

        tracing::info!(subject = %claims.sub, jti = %claims.jti, "Issued admin token");

        Ok((token, claims))
    }

    /// Validate a JWT and return the claims
    ///
    /// # Errors
    /// * `TokenError::Expired` - Signature is valid but `exp` is in the past
    /// * `TokenError::Invalid` - Malformed, wrong algorithm, or bad signature
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid {
                    reason: "invalid signature or malformed".to_string(),
                },
            }
        })?;

        Ok(token_data.claims)
    }
}
