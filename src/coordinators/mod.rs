// Coordinators layer - Workflow orchestration
//
// Coordinators sequence store calls for one API operation: they own the
// transaction, run the access checks and validation, then write.
pub mod admin_coordinator;
pub mod auth_coordinator;
pub mod ticket_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use auth_coordinator::{AuthCoordinator, IssuedTokens};
pub use ticket_coordinator::TicketCoordinator;
