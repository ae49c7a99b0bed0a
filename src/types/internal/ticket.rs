use std::fmt;

use sea_orm::entity::prelude::*;

/// Urgency of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TicketPriority {
    #[sea_orm(string_value = "Low")]
    Low,
    #[default]
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "High")]
    High,
    #[sea_orm(string_value = "Critical")]
    Critical,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Critical => "Critical",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a ticket in its lifecycle
///
/// Allowed moves between states live in `services::ticket_lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TicketStatus {
    #[default]
    #[sea_orm(string_value = "Open")]
    Open,
    #[oai(rename = "In progress")]
    #[sea_orm(string_value = "In progress")]
    InProgress,
    #[sea_orm(string_value = "Resolved")]
    Resolved,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment joined with its author's username
#[derive(Debug, Clone, PartialEq)]
pub struct CommentDetails {
    pub comment: crate::types::db::ticket_comment::Model,
    pub author_username: String,
}

/// A ticket joined with the usernames and comments it is rendered with
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDetails {
    pub ticket: crate::types::db::ticket::Model,
    pub created_by_username: String,
    pub assigned_to_username: Option<String>,
    /// Most recent first, already filtered for the requester
    pub comments: Vec<CommentDetails>,
}

/// Client input for a new ticket, not yet validated
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<i32>,
    pub priority: Option<TicketPriority>,
}

/// Client input for a ticket update, not yet validated
///
/// Outer `None` means "not sent"; `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<i32>>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<Option<i32>>,
}

/// Client input for a new comment, not yet validated
#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    pub content: Option<String>,
    pub is_internal: Option<bool>,
}

/// Aggregates shown on the admin dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_tickets: u64,
    pub tickets_by_status: std::collections::BTreeMap<String, u64>,
    pub tickets_by_priority: std::collections::BTreeMap<String, u64>,
    pub unassigned_tickets: u64,
    pub total_users: u64,
    pub support_team_count: u64,
    pub total_categories: u64,
    pub recent_tickets: Vec<TicketDetails>,
}
