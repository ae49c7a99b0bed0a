//! Status transition rules for tickets

use crate::errors::internal::ValidationError;
use crate::types::internal::TicketStatus;

/// Statuses reachable from `from` in one step
///
/// `admin_override` adds the reopen moves out of `Closed`.
pub fn allowed_transitions(from: TicketStatus, admin_override: bool) -> &'static [TicketStatus] {
    use TicketStatus::*;

    match from {
        Open => &[InProgress, Closed],
        InProgress => &[Resolved, Closed],
        Resolved => &[Closed, InProgress],
        Closed if admin_override => &[Open, InProgress],
        Closed => &[],
    }
}

/// Re-setting the current status is always allowed
pub fn can_transition(from: TicketStatus, to: TicketStatus, admin_override: bool) -> bool {
    from == to || allowed_transitions(from, admin_override).contains(&to)
}

pub fn check_transition(
    from: TicketStatus,
    to: TicketStatus,
    admin_override: bool,
) -> Result<(), ValidationError> {
    if can_transition(from, to, admin_override) {
        return Ok(());
    }
    Err(ValidationError::field(
        "status",
        format!("Cannot change status from '{}' to '{}'.", from, to),
    ))
}
