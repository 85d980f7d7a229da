use std::collections::BTreeSet;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::providers::IdentityProvider;
use crate::stores::ProfileStore;
use crate::types::internal::context::RequestContext;
use crate::types::internal::reconcile::ReconciliationReport;

/// Compares identity records with profile documents and optionally removes
/// profiles that lost their identity
///
/// Identities without a profile are only reported. The identity provider can
/// hold accounts that were never staff, so deleting them is left to an operator.
pub struct ReconciliationCoordinator {
    identity_provider: Arc<dyn IdentityProvider>,
    profile_store: Arc<dyn ProfileStore>,
    audit_logger: Arc<AuditLogger>,
}

impl ReconciliationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self::with_collaborators(
            app_data.identity_provider.clone(),
            app_data.profile_store.clone(),
            app_data.audit_logger.clone(),
        )
    }

    pub fn with_collaborators(
        identity_provider: Arc<dyn IdentityProvider>,
        profile_store: Arc<dyn ProfileStore>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            identity_provider,
            profile_store,
            audit_logger,
        }
    }

    /// Run one reconciliation pass
    ///
    /// Coordinates the sequence of operations:
    /// 1. List profile IDs, then identity IDs
    /// 2. Diff the two sets
    /// 3. If `repair` is set, list identities again and delete each orphaned
    ///    profile whose identity is still absent, auditing each removal
    ///
    /// Creation writes the identity before the profile, so listing profiles first
    /// means every profile in the snapshot already had its identity when the
    /// identity list was taken. The second identity listing skips candidates
    /// whose identity appeared since.
    ///
    /// A failed removal stops the pass; profiles removed before it stay removed.
    pub async fn reconcile(&self, ctx: &RequestContext, repair: bool) -> Result<ReconciliationReport, InternalError> {
        // Step 1: List both sides, profiles first
        let profiles: BTreeSet<String> = self.profile_store.list_profile_ids().await?.into_iter().collect();
        let identities: BTreeSet<String> = self.identity_provider.list_user_ids().await?.into_iter().collect();

        // Step 2: Diff
        let mut report = ReconciliationReport {
            identity_count: identities.len(),
            profile_count: profiles.len(),
            orphaned_identities: identities.difference(&profiles).cloned().collect(),
            orphaned_profiles: profiles.difference(&identities).cloned().collect(),
            removed_profiles: Vec::new(),
        };

        tracing::info!(
            identity_backend = self.identity_provider.name(),
            profile_backend = self.profile_store.name(),
            identities = report.identity_count,
            profiles = report.profile_count,
            orphaned_identities = report.orphaned_identities.len(),
            orphaned_profiles = report.orphaned_profiles.len(),
            "Reconciliation scan complete"
        );

        if !repair || report.orphaned_profiles.is_empty() {
            return Ok(report);
        }

        // Step 3: Recheck, then remove orphaned profiles
        let current_identities: BTreeSet<String> = self.identity_provider.list_user_ids().await?.into_iter().collect();

        for uid in &report.orphaned_profiles {
            if current_identities.contains(uid) {
                tracing::info!(uid = %uid, "Identity appeared during reconciliation; keeping staff profile");
                continue;
            }

            self.profile_store.delete_profile(uid).await?;
            tracing::info!(uid = %uid, "Removed orphaned staff profile");

            if let Err(audit_err) = self.audit_logger.log_orphaned_profile_removed(ctx, uid).await {
                tracing::error!("Failed to log orphaned profile removal: {:?}", audit_err);
            }

            report.removed_profiles.push(uid.clone());
        }

        Ok(report)
    }
}
