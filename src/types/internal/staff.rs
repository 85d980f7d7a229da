use chrono::{DateTime, Utc};
use std::fmt;

/// Role written to every profile created by the staff lifecycle service
pub const STAFF_ROLE: &str = "staff";

/// Whether `uid` can name a profile document
///
/// A uid is used as a single path segment by the document stores, so it may not
/// contain path or URL delimiters and may not be a relative segment.
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && !uid.contains(['/', '\\', '?', '#'])
        && !uid.chars().any(char::is_control)
}

/// Input for `StaffCoordinator::create_staff_account`
///
/// Required fields are optional here so that absence can be reported as an
/// `InvalidArgument` error rather than being impossible to express.
#[derive(Clone, Default)]
pub struct CreateStaffAccount {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub department: Option<String>,
}

impl fmt::Debug for CreateStaffAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateStaffAccount")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .field("department", &self.department)
            .finish()
    }
}

/// Input for `StaffCoordinator::delete_staff_account`
#[derive(Debug, Clone, Default)]
pub struct DeleteStaffAccount {
    pub uid: Option<String>,
}

/// Result of a successful staff creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedStaff {
    pub uid: String,
    pub message: String,
    /// Set only when the service generated the credential
    pub temporary_password: Option<String>,
}

/// Result of a successful staff deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedStaff {
    pub uid: String,
    pub message: String,
    /// The identity provider had no record for the uid; only the profile was cleaned up
    pub identity_already_absent: bool,
}

/// Identity creation request sent to an `IdentityProvider`
#[derive(Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub email_verified: bool,
}

impl fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewIdentity")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("email_verified", &self.email_verified)
            .finish()
    }
}

/// Profile document as written by the service; timestamps are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub department: String,
    pub is_disabled: bool,
}

impl NewStaffProfile {
    /// Profile for a freshly created staff identity
    pub fn staff(uid: &str, email: &str, display_name: &str, department: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role: STAFF_ROLE.to_string(),
            department: department.to_string(),
            is_disabled: false,
        }
    }
}

/// Stored profile document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub department: String,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
