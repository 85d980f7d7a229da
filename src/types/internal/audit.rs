use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    StaffCreated,
    StaffDeleted,
    StaffCreationOrphaned,
    OrphanedProfileRemoved,
    AdminTokenIssued,
    Custom(String),
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::StaffCreated => "staff_created",
            Self::StaffDeleted => "staff_deleted",
            Self::StaffCreationOrphaned => "staff_creation_orphaned",
            Self::OrphanedProfileRemoved => "orphaned_profile_removed",
            Self::AdminTokenIssued => "admin_token_issued",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit event structure for building and storing audit logs
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub actor_id: String,
    pub ip_address: Option<String>,
    pub request_id: String,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            actor_id: "unknown".to_string(),
            ip_address: None,
            request_id: String::new(),
            data: HashMap::new(),
        }
    }
}
