use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::{InternalError, StaffError};
use crate::providers::{CryptoProvider, IdentityProvider};
use crate::stores::ProfileStore;
use crate::types::internal::context::RequestContext;
use crate::types::internal::staff::{
    CreateStaffAccount, CreatedStaff, DeleteStaffAccount, DeletedStaff, NewIdentity, NewStaffProfile, is_valid_uid,
};

/// Staff coordinator that orchestrates the staff account lifecycle
///
/// Keeps an identity record and a profile document paired. The pair is
/// best-effort: the two collaborators share no transaction, and a failed
/// profile write after a successful identity creation leaves the identity in
/// place (reported through an audit event for the reconciliation sweep).
pub struct StaffCoordinator {
    identity_provider: Arc<dyn IdentityProvider>,
    profile_store: Arc<dyn ProfileStore>,
    crypto_provider: Arc<CryptoProvider>,
    audit_logger: Arc<AuditLogger>,
}

/// Trimmed value of a required field, `None` when absent or blank
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl StaffCoordinator {
    /// Create StaffCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing the selected collaborators
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self::with_collaborators(
            app_data.identity_provider.clone(),
            app_data.profile_store.clone(),
            app_data.crypto_provider.clone(),
            app_data.audit_logger.clone(),
        )
    }

    pub fn with_collaborators(
        identity_provider: Arc<dyn IdentityProvider>,
        profile_store: Arc<dyn ProfileStore>,
        crypto_provider: Arc<CryptoProvider>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            identity_provider,
            profile_store,
            crypto_provider,
            audit_logger,
        }
    }

    /// Orchestrate staff account creation
    ///
    /// Coordinates the sequence of operations:
    /// 1. Validate required fields (no collaborator is called on failure)
    /// 2. Resolve the credential, generating a one-time password when none is given
    /// 3. Create the identity (email_verified = false)
    /// 4. Write the profile document with role "staff", not disabled
    /// 5. Audit the creation
    ///
    /// # Returns
    /// * `Ok(CreatedStaff)` - uid, confirmation message, and the generated password if any
    /// * `Err(StaffError)` - `InvalidArgument` for missing fields, `Internal` for collaborator failures
    pub async fn create_staff_account(
        &self,
        ctx: &RequestContext,
        input: CreateStaffAccount,
    ) -> Result<CreatedStaff, StaffError> {
        // Step 1: Validate required fields
        let email = required(&input.email);
        let display_name = required(&input.display_name);
        let department = required(&input.department);

        let missing: Vec<&str> = [
            ("email", email.is_none()),
            ("displayName", display_name.is_none()),
            ("department", department.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        let (Some(email), Some(display_name), Some(department)) = (email, display_name, department) else {
            tracing::debug!("Rejected staff creation, missing fields: {:?}", missing);
            return Err(StaffError::invalid_argument(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        };

        // Step 2: Resolve the credential
        let (password, temporary_password) = match input.password.filter(|p| !p.is_empty()) {
            Some(password) => (password, None),
            None => {
                let generated = self.crypto_provider.generate_secure_password();
                (generated.clone(), Some(generated))
            }
        };

        // Step 3: Create the identity
        let uid = self
            .identity_provider
            .create_user(NewIdentity {
                email: email.to_string(),
                password,
                display_name: display_name.to_string(),
                email_verified: false,
            })
            .await
            .map_err(|err| {
                tracing::error!(
                    backend = self.identity_provider.name(),
                    "Identity creation failed for {}: {}",
                    email,
                    err
                );
                StaffError::from(err)
            })?;

        // Step 4: Write the profile document
        let profile = NewStaffProfile::staff(&uid, email, display_name, department);
        if let Err(err) = self.profile_store.set_profile(profile).await {
            tracing::error!(
                backend = self.profile_store.name(),
                "Profile write failed for {}: {}",
                uid,
                err
            );
            tracing::warn!(uid = %uid, "Identity left without a profile; run `reconcile` to find it");
            self.record_orphaned_identity(ctx, &uid, email, &err).await;
            return Err(StaffError::from(err));
        }

        // Step 5: Audit
        if let Err(audit_err) = self
            .audit_logger
            .log_staff_created(ctx, &uid, email, department, temporary_password.is_some())
            .await
        {
            tracing::error!("Failed to log staff creation: {:?}", audit_err);
        }

        tracing::info!(uid = %uid, actor = %ctx.actor_id, "Staff account created");

        Ok(CreatedStaff {
            message: format!("Staff account for {} created successfully", email),
            uid,
            temporary_password,
        })
    }

    async fn record_orphaned_identity(&self, ctx: &RequestContext, uid: &str, email: &str, err: &InternalError) {
        if let Err(audit_err) = self
            .audit_logger
            .log_staff_creation_orphaned(ctx, uid, email, &err.to_string())
            .await
        {
            tracing::error!("Failed to log orphaned identity: {:?}", audit_err);
        }
    }

    /// Orchestrate staff account deletion
    ///
    /// Coordinates the sequence of operations:
    /// 1. Validate the uid (no collaborator is called on failure). A uid that is
    ///    not a single path segment is rejected, since the not-found branch would
    ///    otherwise delete whatever document it resolves to
    /// 2. Delete the identity
    /// 3. Delete the profile document; when the identity was already gone this
    ///    runs as compensating cleanup
    /// 4. Audit the deletion
    ///
    /// Repeated calls for the same uid succeed through the already-deleted branch.
    ///
    /// # Returns
    /// * `Ok(DeletedStaff)` - Confirmation message; `identity_already_absent` marks the cleanup branch
    /// * `Err(StaffError)` - `InvalidArgument` for a missing uid, `Internal` for collaborator failures
    pub async fn delete_staff_account(
        &self,
        ctx: &RequestContext,
        input: DeleteStaffAccount,
    ) -> Result<DeletedStaff, StaffError> {
        // Step 1: Validate the uid; it is passed on exactly as given
        let Some(uid) = input.uid.as_deref().filter(|uid| !uid.trim().is_empty()) else {
            return Err(StaffError::invalid_argument("Missing required field: uid"));
        };
        if !is_valid_uid(uid) {
            tracing::warn!(uid = ?uid, actor = %ctx.actor_id, "Rejected staff deletion for malformed uid");
            return Err(StaffError::invalid_argument(
                "uid must not contain '/', '\\', '?', '#' or control characters, and must not be '.' or '..'",
            ));
        }

        // Step 2: Delete the identity
        let identity_already_absent = match self.identity_provider.delete_user(uid).await {
            Ok(()) => false,
            Err(err) if err.is_identity_not_found() => {
                tracing::warn!(uid = %uid, "Identity already deleted; removing staff profile only");
                true
            }
            Err(err) => {
                tracing::error!(
                    backend = self.identity_provider.name(),
                    "Identity deletion failed for {}: {}",
                    uid,
                    err
                );
                return Err(StaffError::from(err));
            }
        };

        // Step 3: Delete the profile document
        if let Err(err) = self.profile_store.delete_profile(uid).await {
            tracing::error!(
                backend = self.profile_store.name(),
                "Profile deletion failed for {}: {}",
                uid,
                err
            );
            return Err(StaffError::from(err));
        }

        // Step 4: Audit
        if let Err(audit_err) = self
            .audit_logger
            .log_staff_deleted(ctx, uid, identity_already_absent)
            .await
        {
            tracing::error!("Failed to log staff deletion: {:?}", audit_err);
        }

        tracing::info!(uid = %uid, actor = %ctx.actor_id, identity_already_absent, "Staff account deleted");

        let message = if identity_already_absent {
            format!("Identity {} was already deleted; staff profile removed", uid)
        } else {
            format!("Staff account {} deleted successfully", uid)
        };

        Ok(DeletedStaff {
            uid: uid.to_string(),
            message,
            identity_already_absent,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::errors::StaffErrorKind;
    use crate::providers::crypto_provider::GENERATED_PASSWORD_LENGTH;
    use crate::test::fakes::{FakeIdentityProvider, FakeProfileStore};
    use crate::test::utils::{setup_audit_logger, test_crypto_provider};

    struct Harness {
        identities: Arc<FakeIdentityProvider>,
        profiles: Arc<FakeProfileStore>,
        audit_logger: Arc<AuditLogger>,
        coordinator: StaffCoordinator,
    }

    async fn harness_with(identities: FakeIdentityProvider, profiles: FakeProfileStore) -> Harness {
        let identities = Arc::new(identities);
        let profiles = Arc::new(profiles);
        let audit_logger = setup_audit_logger().await;
        let coordinator = StaffCoordinator::with_collaborators(
            identities.clone(),
            profiles.clone(),
            test_crypto_provider(),
            audit_logger.clone(),
        );

        Harness {
            identities,
            profiles,
            audit_logger,
            coordinator,
        }
    }

    async fn harness() -> Harness {
        harness_with(FakeIdentityProvider::new(), FakeProfileStore::new()).await
    }

    fn ctx() -> RequestContext {
        RequestContext::for_system("staff-test")
    }

    fn create_input(email: Option<&str>, display_name: Option<&str>, department: Option<&str>) -> CreateStaffAccount {
        CreateStaffAccount {
            email: email.map(str::to_string),
            password: None,
            display_name: display_name.map(str::to_string),
            department: department.map(str::to_string),
        }
    }

    fn delete_input(uid: &str) -> DeleteStaffAccount {
        DeleteStaffAccount {
            uid: Some(uid.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_invalid_argument_without_side_effects() {
        let h = harness().await;
        let cases = [
            create_input(None, Some("A B"), Some("Ops")),
            create_input(Some("a@b.com"), None, Some("Ops")),
            create_input(Some("a@b.com"), Some("A B"), None),
            create_input(Some(""), Some("A B"), Some("Ops")),
            create_input(Some("a@b.com"), Some("   "), Some("Ops")),
            create_input(None, None, None),
        ];

        for input in cases {
            let err = h.coordinator.create_staff_account(&ctx(), input).await.unwrap_err();
            assert_eq!(err.kind, StaffErrorKind::InvalidArgument);
        }

        assert_eq!(h.identities.calls(), 0);
        assert_eq!(h.profiles.calls(), 0);
        assert_eq!(h.identities.len(), 0);
        assert_eq!(h.profiles.len(), 0);
    }

    #[tokio::test]
    async fn test_create_missing_fields_are_listed() {
        let h = harness().await;

        let err = h
            .coordinator
            .create_staff_account(&ctx(), create_input(Some("a@b.com"), None, Some(" ")))
            .await
            .unwrap_err();

        assert_eq!(err.message, "Missing required fields: displayName, department");
    }

    #[tokio::test]
    async fn test_create_without_password_generates_one_time_password() {
        let h = harness().await;

        let created = h
            .coordinator
            .create_staff_account(&ctx(), create_input(Some("a@b.com"), Some("A B"), Some("Ops")))
            .await
            .unwrap();

        let temporary = created.temporary_password.clone().unwrap();
        assert_eq!(temporary.chars().count(), GENERATED_PASSWORD_LENGTH);

        let identity = h.identities.get(&created.uid).unwrap();
        assert_eq!(identity.password, temporary);
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.display_name, "A B");
        assert!(!identity.email_verified);

        let profile = h.profiles.get(&created.uid).unwrap();
        assert_eq!(profile.uid, created.uid);
        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.display_name, "A B");
        assert_eq!(profile.role, "staff");
        assert!(!profile.is_disabled);
        assert_eq!(profile.department, "Ops");

        let second = h
            .coordinator
            .create_staff_account(&ctx(), create_input(Some("c@d.com"), Some("C D"), Some("Ops")))
            .await
            .unwrap();
        assert_ne!(second.temporary_password, created.temporary_password);
    }

    #[tokio::test]
    async fn test_create_with_password_uses_it_and_returns_none() {
        let h = harness().await;
        let mut input = create_input(Some("a@b.com"), Some("A B"), Some("Ops"));
        input.password = Some("chosen-password".to_string());

        let created = h.coordinator.create_staff_account(&ctx(), input).await.unwrap();

        assert_eq!(created.temporary_password, None);
        assert_eq!(h.identities.get(&created.uid).unwrap().password, "chosen-password");
        assert!(created.message.contains("a@b.com"));
    }

    #[tokio::test]
    async fn test_create_empty_password_is_treated_as_absent() {
        let h = harness().await;
        let mut input = create_input(Some("a@b.com"), Some("A B"), Some("Ops"));
        input.password = Some(String::new());

        let created = h.coordinator.create_staff_account(&ctx(), input).await.unwrap();
        assert!(created.temporary_password.is_some());
    }

    #[tokio::test]
    async fn test_create_identity_failure_is_internal_and_writes_no_profile() {
        let h = harness_with(
            FakeIdentityProvider::new().failing_create("EMAIL_EXISTS"),
            FakeProfileStore::new(),
        )
        .await;

        let err = h
            .coordinator
            .create_staff_account(&ctx(), create_input(Some("a@b.com"), Some("A B"), Some("Ops")))
            .await
            .unwrap_err();

        assert_eq!(err.kind, StaffErrorKind::Internal);
        assert!(err.message.contains("EMAIL_EXISTS"));
        assert_eq!(h.profiles.set_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_profile_failure_leaves_identity_orphaned() {
        let h = harness_with(
            FakeIdentityProvider::new(),
            FakeProfileStore::new().failing_set("deadline exceeded"),
        )
        .await;

        let err = h
            .coordinator
            .create_staff_account(&ctx(), create_input(Some("a@b.com"), Some("A B"), Some("Ops")))
            .await
            .unwrap_err();

        assert_eq!(err.kind, StaffErrorKind::Internal);
        assert!(err.message.contains("deadline exceeded"));

        // Not rolled back
        assert_eq!(h.identities.len(), 1);
        assert_eq!(h.identities.delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.profiles.len(), 0);

        let orphaned = h
            .audit_logger
            .audit_store
            .events_of_type("staff_creation_orphaned")
            .await
            .unwrap();
        assert_eq!(orphaned.len(), 1);
    }

    #[tokio::test]
    async fn test_create_is_audited() {
        let h = harness().await;

        h.coordinator
            .create_staff_account(&ctx(), create_input(Some("a@b.com"), Some("A B"), Some("Ops")))
            .await
            .unwrap();

        let events = h.audit_logger.audit_store.events_of_type("staff_created").await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor_id, "system:staff-test");
    }

    #[tokio::test]
    async fn test_delete_missing_uid_is_invalid_argument_without_calls() {
        let h = harness().await;

        for input in [
            DeleteStaffAccount { uid: None },
            DeleteStaffAccount { uid: Some(String::new()) },
            DeleteStaffAccount { uid: Some("  ".to_string()) },
        ] {
            let err = h.coordinator.delete_staff_account(&ctx(), input).await.unwrap_err();
            assert_eq!(err.kind, StaffErrorKind::InvalidArgument);
        }

        assert_eq!(h.identities.calls(), 0);
        assert_eq!(h.profiles.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_path_like_uid_is_invalid_argument_without_calls() {
        let h = harness().await;
        h.profiles.seed("admin", "Ops");

        for uid in ["../users/admin", "staff/admin", "admin?x=1", "admin#frag", ".."] {
            let err = h
                .coordinator
                .delete_staff_account(&ctx(), delete_input(uid))
                .await
                .unwrap_err();
            assert_eq!(err.kind, StaffErrorKind::InvalidArgument, "uid {:?}", uid);
        }

        assert_eq!(h.identities.calls(), 0);
        assert_eq!(h.profiles.calls(), 0);
        assert!(h.profiles.contains("admin"));
    }

    #[tokio::test]
    async fn test_delete_passes_uid_through_untrimmed() {
        let h = harness().await;
        h.identities.seed("u1", "a@b.com");
        h.profiles.seed("u1", "Ops");

        let deleted = h.coordinator.delete_staff_account(&ctx(), delete_input(" u1 ")).await.unwrap();

        assert_eq!(deleted.uid, " u1 ");
        assert!(deleted.identity_already_absent);
        assert!(h.identities.contains("u1"));
        assert!(h.profiles.contains("u1"));
    }

    #[tokio::test]
    async fn test_delete_normal_path_removes_both() {
        let h = harness().await;
        h.identities.seed("u1", "a@b.com");
        h.profiles.seed("u1", "Ops");

        let deleted = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap();

        assert!(!deleted.identity_already_absent);
        assert!(!deleted.message.contains("already deleted"));
        assert!(!h.identities.contains("u1"));
        assert!(!h.profiles.contains("u1"));
    }

    #[tokio::test]
    async fn test_delete_with_absent_identity_cleans_up_profile() {
        let h = harness().await;
        h.profiles.seed("u1", "Ops");

        let deleted = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap();

        assert!(deleted.identity_already_absent);
        assert!(deleted.message.contains("already deleted"));
        assert!(!h.profiles.contains("u1"));
    }

    #[tokio::test]
    async fn test_delete_with_both_absent_succeeds() {
        let h = harness().await;

        let deleted = h.coordinator.delete_staff_account(&ctx(), delete_input("ghost")).await.unwrap();

        assert!(deleted.identity_already_absent);
        assert_eq!(h.profiles.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_repeated_delete_succeeds() {
        let h = harness().await;
        h.identities.seed("u1", "a@b.com");
        h.profiles.seed("u1", "Ops");

        let first = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap();
        let second = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap();

        assert!(!first.identity_already_absent);
        assert!(second.identity_already_absent);
        assert_ne!(first.message, second.message);

        let events = h.audit_logger.audit_store.events_of_type("staff_deleted").await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_other_identity_failure_is_internal_and_keeps_profile() {
        let h = harness_with(
            FakeIdentityProvider::new().failing_delete("INTERNAL_ERROR"),
            FakeProfileStore::new(),
        )
        .await;
        h.profiles.seed("u1", "Ops");

        let err = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap_err();

        assert_eq!(err.kind, StaffErrorKind::Internal);
        assert!(err.message.contains("INTERNAL_ERROR"));
        assert!(h.profiles.contains("u1"));
        assert_eq!(h.profiles.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_profile_failure_is_internal_on_both_paths() {
        let h = harness_with(
            FakeIdentityProvider::new(),
            FakeProfileStore::new().failing_delete("unavailable"),
        )
        .await;
        h.identities.seed("u1", "a@b.com");

        let err = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap_err();
        assert_eq!(err.kind, StaffErrorKind::Internal);
        assert!(err.message.contains("unavailable"));

        // Identity is gone now; the cleanup branch fails the same way
        let err = h.coordinator.delete_staff_account(&ctx(), delete_input("u1")).await.unwrap_err();
        assert_eq!(err.kind, StaffErrorKind::Internal);
    }
}
