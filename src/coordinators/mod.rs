// Coordinators layer - Workflow orchestration
//
// Coordinators compose provider and store operations into the staff lifecycle
// workflows shared by the HTTP API and the CLI.

pub mod reconciliation_coordinator;
pub mod staff_coordinator;

pub use reconciliation_coordinator::ReconciliationCoordinator;
pub use staff_coordinator::StaffCoordinator;
