// Staff account CLI commands

use crate::cli::CreateStaffArgs;
use crate::coordinators::StaffCoordinator;
use crate::types::internal::context::RequestContext;
use crate::types::internal::staff::{CreateStaffAccount, CreatedStaff, DeleteStaffAccount, DeletedStaff};

/// Create a staff account and print its uid
///
/// A generated one-time password is printed once; it cannot be recovered later.
pub async fn create_staff(
    coordinator: &StaffCoordinator,
    args: CreateStaffArgs,
) -> Result<CreatedStaff, Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("staff_create");

    let created = coordinator
        .create_staff_account(
            &ctx,
            CreateStaffAccount {
                email: Some(args.email),
                password: args.password,
                display_name: Some(args.display_name),
                department: Some(args.department),
            },
        )
        .await?;

    println!("✅ {}", created.message);
    println!("   UID: {}", created.uid);
    if let Some(password) = &created.temporary_password {
        println!();
        println!("   Temporary password: {}", password);
        println!("   ⚠️  Deliver it to the staff member now; it will not be shown again.");
    }

    Ok(created)
}

/// Delete a staff account
pub async fn delete_staff(
    coordinator: &StaffCoordinator,
    uid: String,
) -> Result<DeletedStaff, Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("staff_delete");

    let deleted = coordinator
        .delete_staff_account(&ctx, DeleteStaffAccount { uid: Some(uid) })
        .await?;

    if deleted.identity_already_absent {
        println!("ℹ️  {}", deleted.message);
    } else {
        println!("✅ {}", deleted.message);
    }

    Ok(deleted)
}
