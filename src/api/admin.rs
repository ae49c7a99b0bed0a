use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::app_data::AppData;
use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::coordinators::{AdminCoordinator, AuthCoordinator};
use crate::errors::ApiError;
use crate::types::dto::admin::{
    AssignTicketRequest, CategoryRequest, CategoryResponse, CreateCategoryApiResponse,
    CreateUserApiResponse, CreateUserRequest, DashboardResponse, UpdateUserRequest, UserResponse,
};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::tickets::TicketResponse;
use crate::types::internal::RequestContext;

/// Administration endpoints: dashboard, users, categories and assignments
pub struct AdminApi {
    auth_coordinator: Arc<AuthCoordinator>,
    admin_coordinator: Arc<AdminCoordinator>,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data.clone())),
            admin_coordinator: Arc::new(AdminCoordinator::new(app_data)),
        }
    }

    async fn context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, ApiError> {
        helpers::request_context(req, auth, &self.auth_coordinator)
            .await
            .map_err(ApiError::from_internal_error)
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Dashboard and ticket assignment
    Admin,
    /// User account management, superusers only
    Users,
    /// Ticket categories
    Categories,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    #[oai(path = "/dashboard", method = "get", tag = "AdminTags::Admin")]
    async fn dashboard(&self, req: &Request, auth: BearerAuth) -> Result<Json<DashboardResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let summary = self
            .admin_coordinator
            .dashboard(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(summary.into()))
    }

    #[oai(path = "/users", method = "get", tag = "AdminTags::Users")]
    async fn list_users(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let users = self
            .admin_coordinator
            .list_users(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    #[oai(path = "/users", method = "post", tag = "AdminTags::Users")]
    async fn create_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let user = self
            .admin_coordinator
            .create_user(&ctx, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(CreateUserApiResponse::Created(Json(user.into())))
    }

    #[oai(path = "/users/:id", method = "get", tag = "AdminTags::Users")]
    async fn get_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let user = self
            .admin_coordinator
            .get_user(&ctx, id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(user.into()))
    }

    /// Update profile fields and flags; `groups` replaces all memberships
    #[oai(path = "/users/:id", method = "patch", tag = "AdminTags::Users")]
    async fn update_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let user = self
            .admin_coordinator
            .update_user(&ctx, id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(user.into()))
    }

    /// Delete a user together with their tickets and comments
    #[oai(path = "/users/:id", method = "delete", tag = "AdminTags::Users")]
    async fn delete_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        self.admin_coordinator
            .delete_user(&ctx, id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("User deleted")))
    }

    #[oai(path = "/categories", method = "get", tag = "AdminTags::Categories")]
    async fn list_categories(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let categories = self
            .admin_coordinator
            .list_categories(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
    }

    #[oai(path = "/categories", method = "post", tag = "AdminTags::Categories")]
    async fn create_category(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CategoryRequest>,
    ) -> Result<CreateCategoryApiResponse, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let category = self
            .admin_coordinator
            .create_category(&ctx, body.0.name)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(CreateCategoryApiResponse::Created(Json(category.into())))
    }

    #[oai(path = "/categories/:id", method = "patch", tag = "AdminTags::Categories")]
    async fn rename_category(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<CategoryRequest>,
    ) -> Result<Json<CategoryResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let category = self
            .admin_coordinator
            .rename_category(&ctx, id.0, body.0.name)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(category.into()))
    }

    /// Delete a category; tickets that used it become uncategorized
    #[oai(path = "/categories/:id", method = "delete", tag = "AdminTags::Categories")]
    async fn delete_category(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        self.admin_coordinator
            .delete_category(&ctx, id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Category deleted")))
    }

    /// Tickets waiting for an assignee, newest first
    #[oai(path = "/assignments", method = "get", tag = "AdminTags::Admin")]
    async fn list_unassigned(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<TicketResponse>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let tickets = self
            .admin_coordinator
            .list_unassigned(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
    }

    #[oai(path = "/tickets/:id/assign", method = "patch", tag = "AdminTags::Admin")]
    async fn assign_ticket(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<AssignTicketRequest>,
    ) -> Result<Json<TicketResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let ticket = self
            .admin_coordinator
            .assign_ticket(&ctx, id.0, body.0.assigned_to)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(ticket.into()))
    }
}
