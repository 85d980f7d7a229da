// Reconciliation CLI command

use crate::coordinators::ReconciliationCoordinator;
use crate::types::internal::context::RequestContext;
use crate::types::internal::reconcile::ReconciliationReport;

/// Run one reconciliation pass and print the report
///
/// # Arguments
/// * `repair` - Delete orphaned profile documents
pub async fn run_reconciliation(
    coordinator: &ReconciliationCoordinator,
    repair: bool,
) -> Result<ReconciliationReport, Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("reconcile");

    let report = coordinator.reconcile(&ctx, repair).await?;

    println!("Identities: {}", report.identity_count);
    println!("Profiles:   {}", report.profile_count);

    if report.is_consistent() {
        println!("✅ Every identity has a staff profile and every profile has an identity.");
        return Ok(report);
    }

    if !report.orphaned_identities.is_empty() {
        println!();
        println!("⚠️  Identities without a staff profile ({}):", report.orphaned_identities.len());
        for uid in &report.orphaned_identities {
            println!("   {}", uid);
        }
    }

    if !report.orphaned_profiles.is_empty() {
        println!();
        println!("⚠️  Staff profiles without an identity ({}):", report.orphaned_profiles.len());
        for uid in &report.orphaned_profiles {
            let status = if report.removed_profiles.contains(uid) { " (removed)" } else { "" };
            println!("   {}{}", uid, status);
        }
        if !repair {
            println!("   Re-run with --repair to remove them.");
        }
    }

    Ok(report)
}
