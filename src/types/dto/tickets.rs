use poem_openapi::{ApiResponse, Object, payload::Json, types::MaybeUndefined};

use crate::types::format_timestamp;
use crate::types::internal::{
    CommentDetails, CommentDraft, TicketDetails, TicketDraft, TicketPatch, TicketPriority,
    TicketStatus,
};

/// Request to open a new ticket
///
/// Only these fields are read from the client. Status, creator and
/// timestamps are always set by the server.
#[derive(Object, Debug, Clone, Default)]
pub struct CreateTicketRequest {
    /// Short summary, at most 50 characters
    pub title: Option<String>,

    /// Full description of the problem
    pub description: Option<String>,

    /// Optional category id
    pub category: Option<i32>,

    /// Defaults to Medium
    pub priority: Option<TicketPriority>,
}

/// Partial update of a ticket; absent fields are left untouched
#[derive(Object, Debug, Clone, Default)]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `null` clears the category
    pub category: MaybeUndefined<i32>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    /// `null` unassigns the ticket
    pub assigned_to: MaybeUndefined<i32>,
}

/// Request to add a comment to a ticket
#[derive(Object, Debug, Clone, Default)]
pub struct CreateCommentRequest {
    pub content: Option<String>,

    /// Only honoured for staff authors
    pub is_internal: Option<bool>,
}

impl From<CreateTicketRequest> for TicketDraft {
    fn from(request: CreateTicketRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            priority: request.priority,
        }
    }
}

fn into_patch_value<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(value) => Some(Some(value)),
    }
}

impl From<UpdateTicketRequest> for TicketPatch {
    fn from(request: UpdateTicketRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: into_patch_value(request.category),
            priority: request.priority,
            status: request.status,
            assigned_to: into_patch_value(request.assigned_to),
        }
    }
}

impl From<CreateCommentRequest> for CommentDraft {
    fn from(request: CreateCommentRequest) -> Self {
        Self {
            content: request.content,
            is_internal: request.is_internal,
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct CommentResponse {
    pub id: i32,
    pub ticket: i32,
    pub author: i32,
    pub author_username: String,
    pub content: String,
    pub is_internal: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CommentDetails> for CommentResponse {
    fn from(details: CommentDetails) -> Self {
        let CommentDetails {
            comment,
            author_username,
        } = details;

        Self {
            id: comment.id,
            ticket: comment.ticket_id,
            author: comment.author_id,
            author_username,
            content: comment.content,
            is_internal: comment.is_internal,
            created_at: format_timestamp(comment.created_at),
            updated_at: format_timestamp(comment.updated_at),
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct TicketResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: Option<i32>,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_by: i32,
    pub created_by_username: String,
    pub assigned_to: Option<i32>,
    pub assigned_to_username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub comments: Vec<CommentResponse>,
}

impl From<TicketDetails> for TicketResponse {
    fn from(details: TicketDetails) -> Self {
        let TicketDetails {
            ticket,
            created_by_username,
            assigned_to_username,
            comments,
        } = details;

        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            category: ticket.category_id,
            priority: ticket.priority,
            status: ticket.status,
            created_by: ticket.created_by,
            created_by_username,
            assigned_to: ticket.assigned_to,
            assigned_to_username,
            created_at: format_timestamp(ticket.created_at),
            updated_at: format_timestamp(ticket.updated_at),
            comments: comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

/// Response for `POST /tickets`
#[derive(ApiResponse)]
pub enum CreateTicketApiResponse {
    /// Ticket opened
    #[oai(status = 201)]
    Created(Json<TicketResponse>),
}

/// Response for `POST /tickets/{id}/comments`
#[derive(ApiResponse)]
pub enum CreateCommentApiResponse {
    /// Comment added
    #[oai(status = 201)]
    Created(Json<CommentResponse>),
}
