use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::errors::InternalError;
use crate::stores::audit_store::AuditStore;
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;

/// Audit logging provider for staff lifecycle events
///
/// Every event records the actor, client IP, and request id from the
/// `RequestContext`. The target of the action goes into the event data.
/// Callers log failures with `tracing::error!` and carry on; an audit write
/// never fails the operation being audited.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    /// # Arguments
    /// * `audit_store` - Reference to the AuditStore for writing events
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    fn event_for(ctx: &RequestContext, event_type: EventType) -> AuditEvent {
        let mut event = AuditEvent::new(event_type);
        event.actor_id = ctx.actor_id.clone();
        event.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        event.request_id = ctx.request_id.to_string();
        event.data.insert("source".to_string(), json!(format!("{:?}", ctx.source)));
        if let Some(claims) = &ctx.claims {
            event.data.insert("jwt_id".to_string(), json!(claims.jti));
        }
        event
    }

    /// Log a successful staff account creation
    ///
    /// # Arguments
    /// * `generated_password` - Whether the credential was generated by the service
    pub async fn log_staff_created(
        &self,
        ctx: &RequestContext,
        uid: &str,
        email: &str,
        department: &str,
        generated_password: bool,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::StaffCreated);
        event.data.insert("target_uid".to_string(), json!(uid));
        event.data.insert("email".to_string(), json!(email));
        event.data.insert("department".to_string(), json!(department));
        event
            .data
            .insert("generated_password".to_string(), json!(generated_password));

        self.audit_store.write_event(event).await
    }

    /// Log a staff deletion
    ///
    /// # Arguments
    /// * `identity_already_absent` - The identity was gone and only the profile was cleaned up
    pub async fn log_staff_deleted(
        &self,
        ctx: &RequestContext,
        uid: &str,
        identity_already_absent: bool,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::StaffDeleted);
        event.data.insert("target_uid".to_string(), json!(uid));
        event
            .data
            .insert("identity_already_absent".to_string(), json!(identity_already_absent));

        self.audit_store.write_event(event).await
    }

    /// Log an identity left without a profile after the profile write failed
    pub async fn log_staff_creation_orphaned(
        &self,
        ctx: &RequestContext,
        uid: &str,
        email: &str,
        reason: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::StaffCreationOrphaned);
        event.data.insert("target_uid".to_string(), json!(uid));
        event.data.insert("email".to_string(), json!(email));
        event.data.insert("reason".to_string(), json!(reason));

        self.audit_store.write_event(event).await
    }

    /// Log removal of a profile whose identity no longer exists
    pub async fn log_orphaned_profile_removed(&self, ctx: &RequestContext, uid: &str) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::OrphanedProfileRemoved);
        event.data.insert("target_uid".to_string(), json!(uid));

        self.audit_store.write_event(event).await
    }

    /// Log issuance of an operator admin token
    pub async fn log_admin_token_issued(
        &self,
        ctx: &RequestContext,
        subject: &str,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::AdminTokenIssued);
        event.data.insert("subject".to_string(), json!(subject));
        event.data.insert("jwt_id".to_string(), json!(jti));
        event
            .data
            .insert("expires_at".to_string(), json!(expires_at.to_rfc3339()));

        self.audit_store.write_event(event).await
    }
}
