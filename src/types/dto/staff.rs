use poem_openapi::Object;

use crate::types::internal::staff::{CreateStaffAccount, CreatedStaff, DeleteStaffAccount, DeletedStaff};

/// Request to create a staff account
///
/// Every field is optional on the wire so that a missing field is reported as
/// `invalid_argument` by the service instead of a body parse failure.
#[derive(Object, Debug, Default)]
#[oai(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    /// Sign-in email for the new identity
    pub email: Option<String>,

    /// Initial password; a one-time password is generated when omitted
    pub password: Option<String>,

    /// Name shown in the dashboard
    pub display_name: Option<String>,

    /// Department the staff member belongs to
    pub department: Option<String>,
}

/// Response after creating a staff account
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreateStaffResponse {
    pub success: bool,

    /// Identity uid, also the profile document key
    pub uid: String,

    pub message: String,

    /// Generated one-time password, only present when none was supplied.
    /// Deliver it to the staff member out-of-band; it is not retrievable later.
    pub temporary_password: Option<String>,
}

/// Request to delete a staff account
#[derive(Object, Debug, Default)]
pub struct DeleteStaffRequest {
    pub uid: Option<String>,
}

/// Response after deleting a staff account
#[derive(Object, Debug)]
pub struct DeleteStaffResponse {
    pub success: bool,
    pub message: String,
}

impl From<CreateStaffRequest> for CreateStaffAccount {
    fn from(req: CreateStaffRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            department: req.department,
        }
    }
}

impl From<DeleteStaffRequest> for DeleteStaffAccount {
    fn from(req: DeleteStaffRequest) -> Self {
        Self { uid: req.uid }
    }
}

impl From<CreatedStaff> for CreateStaffResponse {
    fn from(created: CreatedStaff) -> Self {
        Self {
            success: true,
            uid: created.uid,
            message: created.message,
            temporary_password: created.temporary_password,
        }
    }
}

impl From<DeletedStaff> for DeleteStaffResponse {
    fn from(deleted: DeletedStaff) -> Self {
        Self {
            success: true,
            message: deleted.message,
        }
    }
}
