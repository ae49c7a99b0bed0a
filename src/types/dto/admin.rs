use std::collections::BTreeMap;

use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::category;
use crate::types::format_timestamp;
use crate::types::internal::{DashboardSummary, UserDetails, UserDraft, UserPatch};

use super::tickets::TicketResponse;

/// Aggregate counts for the admin dashboard
#[derive(Object, Debug)]
pub struct DashboardResponse {
    pub total_tickets: u64,

    /// Ticket count keyed by status, every status present
    pub tickets_by_status: BTreeMap<String, u64>,

    /// Ticket count keyed by priority, every priority present
    pub tickets_by_priority: BTreeMap<String, u64>,

    pub unassigned_tickets: u64,
    pub total_users: u64,
    pub support_team_count: u64,
    pub total_categories: u64,

    /// The five most recently created tickets
    pub recent_tickets: Vec<TicketResponse>,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            total_tickets: summary.total_tickets,
            tickets_by_status: summary.tickets_by_status,
            tickets_by_priority: summary.tickets_by_priority,
            unassigned_tickets: summary.unassigned_tickets,
            total_users: summary.total_users,
            support_team_count: summary.support_team_count,
            total_categories: summary.total_categories,
            recent_tickets: summary
                .recent_tickets
                .into_iter()
                .map(TicketResponse::from)
                .collect(),
        }
    }
}

/// Denormalized user view returned by the user management endpoints
#[derive(Object, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub groups: Vec<String>,
    pub date_joined: String,
}

impl From<UserDetails> for UserResponse {
    fn from(details: UserDetails) -> Self {
        let UserDetails { user, groups } = details;

        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            groups,
            date_joined: format_timestamp(user.created_at),
        }
    }
}

/// Request to create a user account
///
/// Username and password are optional here so missing values are reported
/// as field errors instead of a payload parse failure.
#[derive(Object, Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    /// Group names; each must already exist
    pub groups: Option<Vec<String>>,
}

/// Partial update of a user account
#[derive(Object, Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    /// Replaces the full membership list when present
    pub groups: Option<Vec<String>>,
}

impl From<CreateUserRequest> for UserDraft {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            is_staff: request.is_staff,
            is_superuser: request.is_superuser,
            groups: request.groups,
        }
    }
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            is_staff: request.is_staff,
            is_superuser: request.is_superuser,
            groups: request.groups,
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Create or rename a category
#[derive(Object, Debug, Clone, Default)]
pub struct CategoryRequest {
    pub name: Option<String>,
}

/// Assign a ticket to a support agent
#[derive(Object, Debug, Clone, Default)]
pub struct AssignTicketRequest {
    /// Id of the user to assign
    pub assigned_to: Option<i32>,
}

/// Response for `POST /admin/users`
#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}

/// Response for `POST /admin/categories`
#[derive(ApiResponse)]
pub enum CreateCategoryApiResponse {
    #[oai(status = 201)]
    Created(Json<CategoryResponse>),
}
