//! Role-based permission predicates
//!
//! Every function is pure: the acting [`Principal`] is always passed in and
//! the ticket, when relevant, is the stored row. Denials are turned into
//! [`InternalError::Access`] by [`authorize`].

use crate::errors::InternalError;
use crate::types::db::ticket;
use crate::types::internal::{Principal, Role};

/// Superuser, or member of "IT Staff"
pub fn is_admin(user: &Principal) -> bool {
    user.is_superuser || user.has_role(Role::ItStaff)
}

/// Member of "Support Team"
pub fn is_support_agent(user: &Principal) -> bool {
    user.has_role(Role::SupportTeam)
}

pub fn can_view_ticket(user: &Principal, ticket: &ticket::Model) -> bool {
    is_admin(user) || is_support_agent(user) || ticket.created_by == user.user_id
}

/// Which tickets a listing may contain for a given user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    All,
    AssignedTo(i32),
    CreatedBy(i32),
}

/// Admins see everything, agents their assignments, everyone else their own tickets
pub fn ticket_scope(user: &Principal) -> TicketScope {
    if is_admin(user) {
        TicketScope::All
    } else if is_support_agent(user) {
        TicketScope::AssignedTo(user.user_id)
    } else {
        TicketScope::CreatedBy(user.user_id)
    }
}

/// Admins, or the support agent the ticket is assigned to
pub fn can_update_ticket(user: &Principal, ticket: &ticket::Model) -> bool {
    if is_admin(user) {
        return true;
    }
    is_support_agent(user) && ticket.assigned_to == Some(user.user_id)
}

pub fn can_comment_on_ticket(user: &Principal, ticket: &ticket::Model) -> bool {
    can_view_ticket(user, ticket)
}

pub fn can_see_internal_comments(user: &Principal) -> bool {
    is_admin(user) || is_support_agent(user)
}

pub fn can_manage_categories(user: &Principal) -> bool {
    is_admin(user)
}

pub fn can_manage_assignments(user: &Principal) -> bool {
    is_admin(user)
}

pub fn can_view_dashboard(user: &Principal) -> bool {
    is_admin(user)
}

/// Superusers only; IT Staff membership is not enough
pub fn can_manage_users(user: &Principal) -> bool {
    user.is_superuser
}

/// Turn a predicate result into an access decision
pub fn authorize(user: &Principal, allowed: bool, reason: &str) -> Result<(), InternalError> {
    if allowed {
        return Ok(());
    }
    tracing::warn!(user_id = user.user_id, username = %user.username, "Access denied: {}", reason);
    Err(InternalError::forbidden(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::{TicketPriority, TicketStatus};

    const CREATOR: i32 = 1;
    const AGENT: i32 = 2;
    const OTHER_AGENT: i32 = 3;
    const IT_STAFF: i32 = 4;
    const SUPERUSER: i32 = 5;
    const STRANGER: i32 = 6;

    fn principal(user_id: i32, is_superuser: bool, groups: &[&str]) -> Principal {
        Principal::new(user_id, format!("user{}", user_id), is_superuser, false, groups.iter().copied())
    }

    fn creator() -> Principal {
        principal(CREATOR, false, &[])
    }
    fn agent() -> Principal {
        principal(AGENT, false, &["Support Team"])
    }
    fn other_agent() -> Principal {
        principal(OTHER_AGENT, false, &["Support Team"])
    }
    fn it_staff() -> Principal {
        principal(IT_STAFF, false, &["IT Staff"])
    }
    fn superuser() -> Principal {
        principal(SUPERUSER, true, &[])
    }
    fn stranger() -> Principal {
        principal(STRANGER, false, &["Marketing"])
    }

    fn ticket_assigned_to(assigned_to: Option<i32>) -> ticket::Model {
        ticket::Model {
            id: 10,
            title: "Printer jam".to_string(),
            description: "Paper stuck".to_string(),
            category_id: None,
            priority: TicketPriority::Medium,
            status: TicketStatus::Open,
            created_by: CREATOR,
            assigned_to,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_is_admin_truth_table() {
        assert!(is_admin(&superuser()));
        assert!(is_admin(&it_staff()));
        assert!(!is_admin(&agent()));
        assert!(!is_admin(&creator()));
        assert!(!is_admin(&stranger()));
    }

    #[test]
    fn test_unknown_groups_grant_nothing() {
        let user = stranger();
        let ticket = ticket_assigned_to(Some(STRANGER));

        assert!(!is_support_agent(&user));
        assert!(!can_view_ticket(&user, &ticket));
        assert!(!can_update_ticket(&user, &ticket));
        assert!(!can_see_internal_comments(&user));
        assert_eq!(ticket_scope(&user), TicketScope::CreatedBy(STRANGER));
    }

    #[test]
    fn test_can_view_ticket_truth_table() {
        let ticket = ticket_assigned_to(Some(AGENT));

        assert!(can_view_ticket(&creator(), &ticket));
        assert!(can_view_ticket(&agent(), &ticket));
        assert!(can_view_ticket(&other_agent(), &ticket));
        assert!(can_view_ticket(&it_staff(), &ticket));
        assert!(can_view_ticket(&superuser(), &ticket));
        assert!(!can_view_ticket(&stranger(), &ticket));
    }

    #[test]
    fn test_can_update_ticket_truth_table() {
        let ticket = ticket_assigned_to(Some(AGENT));

        assert!(can_update_ticket(&agent(), &ticket));
        assert!(!can_update_ticket(&other_agent(), &ticket));
        assert!(can_update_ticket(&it_staff(), &ticket));
        assert!(can_update_ticket(&superuser(), &ticket));
        assert!(!can_update_ticket(&creator(), &ticket));
        assert!(!can_update_ticket(&stranger(), &ticket));
    }

    #[test]
    fn test_unassigned_ticket_is_not_updatable_by_agents() {
        let ticket = ticket_assigned_to(None);

        assert!(!can_update_ticket(&agent(), &ticket));
        assert!(can_update_ticket(&it_staff(), &ticket));
    }

    #[test]
    fn test_assigned_non_agent_cannot_update() {
        // assignment alone does not grant update rights without the role
        let ticket = ticket_assigned_to(Some(CREATOR));

        assert!(!can_update_ticket(&creator(), &ticket));
    }

    #[test]
    fn test_ticket_scope_per_role() {
        assert_eq!(ticket_scope(&superuser()), TicketScope::All);
        assert_eq!(ticket_scope(&it_staff()), TicketScope::All);
        assert_eq!(ticket_scope(&agent()), TicketScope::AssignedTo(AGENT));
        assert_eq!(ticket_scope(&creator()), TicketScope::CreatedBy(CREATOR));
    }

    #[test]
    fn test_agent_and_it_staff_member_gets_admin_scope() {
        let both = principal(AGENT, false, &["Support Team", "IT Staff"]);

        assert_eq!(ticket_scope(&both), TicketScope::All);
    }

    #[test]
    fn test_comment_rules_follow_view_rules() {
        let ticket = ticket_assigned_to(None);

        assert!(can_comment_on_ticket(&creator(), &ticket));
        assert!(can_comment_on_ticket(&agent(), &ticket));
        assert!(!can_comment_on_ticket(&stranger(), &ticket));
    }

    #[test]
    fn test_internal_comment_visibility() {
        assert!(can_see_internal_comments(&agent()));
        assert!(can_see_internal_comments(&it_staff()));
        assert!(can_see_internal_comments(&superuser()));
        assert!(!can_see_internal_comments(&creator()));
    }

    #[test]
    fn test_admin_only_capabilities() {
        for user in [superuser(), it_staff()] {
            assert!(can_manage_categories(&user));
            assert!(can_manage_assignments(&user));
            assert!(can_view_dashboard(&user));
        }
        for user in [agent(), creator(), stranger()] {
            assert!(!can_manage_categories(&user));
            assert!(!can_manage_assignments(&user));
            assert!(!can_view_dashboard(&user));
        }
    }

    #[test]
    fn test_user_management_requires_superuser() {
        assert!(can_manage_users(&superuser()));
        assert!(!can_manage_users(&it_staff()));
        assert!(!can_manage_users(&agent()));
    }

    #[test]
    fn test_authorize_returns_reason_on_denial() {
        assert!(authorize(&creator(), true, "never shown").is_ok());

        match authorize(&creator(), false, "only admins may do this") {
            Err(InternalError::Access(denied)) => {
                assert_eq!(denied.reason(), "only admins may do this")
            }
            other => panic!("expected access denial, got {:?}", other),
        }
    }
}
