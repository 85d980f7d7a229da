/// Outcome of comparing identity records against profile documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub identity_count: usize,
    pub profile_count: usize,
    /// Identities with no profile document (e.g. a profile write failed during creation)
    pub orphaned_identities: Vec<String>,
    /// Profile documents whose identity no longer exists
    pub orphaned_profiles: Vec<String>,
    /// Orphaned profiles deleted during a repair run
    pub removed_profiles: Vec<String>,
}

impl ReconciliationReport {
    pub fn is_consistent(&self) -> bool {
        self.orphaned_identities.is_empty() && self.orphaned_profiles.is_empty()
    }
}
