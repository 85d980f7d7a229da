// Operator token CLI command

use chrono::DateTime;

use crate::audit::AuditLogger;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Issue an admin JWT and print it
///
/// Only the token's id is written to the audit trail.
pub async fn issue_token(
    token_provider: &TokenProvider,
    audit_logger: &AuditLogger,
    subject: &str,
    ttl_minutes: i64,
) -> Result<String, Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("token_issue");

    let (token, claims) = token_provider.issue_admin_token(subject, ttl_minutes)?;
    let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or("token expiry out of range")?;

    if let Err(audit_err) = audit_logger
        .log_admin_token_issued(&ctx, &claims.sub, &claims.jti, expires_at)
        .await
    {
        tracing::error!("Failed to log token issuance: {:?}", audit_err);
    }

    println!("{}", token);
    eprintln!("Admin token for '{}' expires at {}", claims.sub, expires_at.to_rfc3339());

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_audit_logger, test_token_provider};

    #[tokio::test]
    async fn test_issued_token_validates_and_is_audited() {
        let token_provider = test_token_provider();
        let audit_logger = setup_audit_logger().await;

        let token = issue_token(&token_provider, &audit_logger, "ops", 5).await.unwrap();

        let claims = token_provider.validate_jwt(&token).unwrap();
        assert!(claims.is_admin);
        assert_eq!(claims.sub, "ops");

        let events = audit_logger.audit_store.events_of_type("admin_token_issued").await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(!events[0].data.contains(&token));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_rejected() {
        let audit_logger = setup_audit_logger().await;
        assert!(issue_token(&test_token_provider(), &audit_logger, "ops", 0).await.is_err());
    }
}
