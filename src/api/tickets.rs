use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::app_data::AppData;
use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, TicketCoordinator};
use crate::errors::ApiError;
use crate::types::dto::tickets::{
    CommentResponse, CreateCommentApiResponse, CreateCommentRequest, CreateTicketApiResponse,
    CreateTicketRequest, TicketResponse, UpdateTicketRequest,
};
use crate::types::internal::RequestContext;

/// Ticket and comment endpoints for every authenticated user
pub struct TicketsApi {
    auth_coordinator: Arc<AuthCoordinator>,
    ticket_coordinator: Arc<TicketCoordinator>,
}

impl TicketsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data.clone())),
            ticket_coordinator: Arc::new(TicketCoordinator::new(app_data)),
        }
    }

    async fn context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, ApiError> {
        helpers::request_context(req, auth, &self.auth_coordinator)
            .await
            .map_err(ApiError::from_internal_error)
    }
}

#[derive(Tags)]
enum TicketTags {
    /// Tickets and their comments
    Tickets,
}

#[OpenApi]
impl TicketsApi {
    /// Tickets visible to the caller, newest first
    ///
    /// IT Staff and superusers see every ticket, Support Team members the
    /// tickets assigned to them, everyone else the tickets they opened.
    #[oai(path = "/tickets", method = "get", tag = "TicketTags::Tickets")]
    async fn list_tickets(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<TicketResponse>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let tickets = self
            .ticket_coordinator
            .list_tickets(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
    }

    /// Open a ticket as the caller
    #[oai(path = "/tickets", method = "post", tag = "TicketTags::Tickets")]
    async fn create_ticket(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateTicketRequest>,
    ) -> Result<CreateTicketApiResponse, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let ticket = self
            .ticket_coordinator
            .create_ticket(&ctx, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(CreateTicketApiResponse::Created(Json(ticket.into())))
    }

    #[oai(path = "/tickets/:id", method = "get", tag = "TicketTags::Tickets")]
    async fn get_ticket(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<TicketResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let ticket = self
            .ticket_coordinator
            .get_ticket(&ctx, id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(ticket.into()))
    }

    /// Partially update a ticket
    ///
    /// Changing `assigned_to` additionally requires assignment rights.
    #[oai(path = "/tickets/:id", method = "patch", tag = "TicketTags::Tickets")]
    async fn update_ticket(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateTicketRequest>,
    ) -> Result<Json<TicketResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let ticket = self
            .ticket_coordinator
            .update_ticket(&ctx, id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(ticket.into()))
    }

    /// Comments on a ticket, newest first; internal notes only for staff
    #[oai(path = "/tickets/:id/comments", method = "get", tag = "TicketTags::Tickets")]
    async fn list_comments(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<CommentResponse>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let comments = self
            .ticket_coordinator
            .list_comments(&ctx, id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
    }

    #[oai(path = "/tickets/:id/comments", method = "post", tag = "TicketTags::Tickets")]
    async fn add_comment(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<CreateCommentRequest>,
    ) -> Result<CreateCommentApiResponse, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let comment = self
            .ticket_coordinator
            .add_comment(&ctx, id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(CreateCommentApiResponse::Created(Json(comment.into())))
    }
}
