use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::services::{access_control, ticket_lifecycle, validation};
use crate::stores::comment_store::NewComment;
use crate::stores::ticket_store::{NewTicket, TicketChanges};
use crate::stores::{CategoryStore, CommentStore, TicketStore, UserStore};
use crate::types::db::ticket;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{
    CommentDetails, CommentDraft, Principal, Role, TicketDetails, TicketDraft, TicketPatch,
};

/// Orchestrates the ticket and comment workflows
///
/// Every mutation runs in one transaction: load, authorize, validate, write.
/// Nothing is written once a check has failed.
pub struct TicketCoordinator {
    db: DatabaseConnection,
    ticket_store: Arc<TicketStore>,
    comment_store: Arc<CommentStore>,
    category_store: Arc<CategoryStore>,
    user_store: Arc<UserStore>,
}

impl TicketCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            ticket_store: app_data.ticket_store.clone(),
            comment_store: app_data.comment_store.clone(),
            category_store: app_data.category_store.clone(),
            user_store: app_data.user_store.clone(),
        }
    }

    /// Tickets the caller may list, newest first
    pub async fn list_tickets(&self, ctx: &RequestContext) -> Result<Vec<TicketDetails>, InternalError> {
        let principal = &ctx.principal;
        let scope = access_control::ticket_scope(principal);

        let tickets = self.ticket_store.list(&self.db, scope).await?;
        self.ticket_store
            .load_details(&self.db, tickets, access_control::can_see_internal_comments(principal))
            .await
    }

    /// Open a ticket on behalf of the caller
    ///
    /// Status starts at Open and the creator is always the caller.
    pub async fn create_ticket(
        &self,
        ctx: &RequestContext,
        draft: TicketDraft,
    ) -> Result<TicketDetails, InternalError> {
        let principal = &ctx.principal;
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let mut errors = ValidationError::new();
        let title = validation::clean_title(&mut errors, draft.title.as_deref());
        let description =
            validation::clean_required(&mut errors, "description", draft.description.as_deref());
        if let Some(category_id) = draft.category {
            self.check_category(&txn, category_id, &mut errors).await?;
        }
        errors.into_result()?;

        let ticket = self
            .ticket_store
            .create(
                &txn,
                NewTicket {
                    title: title.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                    category_id: draft.category,
                    priority: draft.priority.unwrap_or_default(),
                    created_by: principal.user_id,
                },
            )
            .await?;
        let details = self
            .ticket_store
            .load_one(&txn, ticket, access_control::can_see_internal_comments(principal))
            .await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(
            ticket_id = details.ticket.id,
            user_id = principal.user_id,
            request_id = %ctx.request_id,
            "Ticket created"
        );
        Ok(details)
    }

    pub async fn get_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
    ) -> Result<TicketDetails, InternalError> {
        let principal = &ctx.principal;
        let ticket = self.ticket_store.get_by_id(&self.db, ticket_id).await?;
        access_control::authorize(
            principal,
            access_control::can_view_ticket(principal, &ticket),
            "you may only view tickets you created",
        )?;

        self.ticket_store
            .load_one(&self.db, ticket, access_control::can_see_internal_comments(principal))
            .await
    }

    /// Apply a partial update
    ///
    /// Changing the assignee additionally requires assignment rights, and
    /// status changes must follow the lifecycle.
    pub async fn update_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        patch: TicketPatch,
    ) -> Result<TicketDetails, InternalError> {
        let principal = &ctx.principal;
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        access_control::authorize(
            principal,
            access_control::can_update_ticket(principal, &ticket),
            "only admins or the assigned support agent may update this ticket",
        )?;
        if patch.assigned_to.is_some_and(|assignee| assignee != ticket.assigned_to) {
            access_control::authorize(
                principal,
                access_control::can_manage_assignments(principal),
                "only admins may change the assignee",
            )?;
        }

        let changes = self.validate_patch(&txn, principal, &ticket, patch).await?;
        let previous_status = ticket.status;
        let updated = self.ticket_store.update(&txn, ticket, changes).await?;
        let details = self
            .ticket_store
            .load_one(&txn, updated, access_control::can_see_internal_comments(principal))
            .await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        if previous_status != details.ticket.status {
            tracing::info!(
                ticket_id,
                from = %previous_status,
                to = %details.ticket.status,
                user_id = principal.user_id,
                "Ticket status changed"
            );
        }
        Ok(details)
    }

    async fn validate_patch(
        &self,
        conn: &impl ConnectionTrait,
        principal: &Principal,
        ticket: &ticket::Model,
        patch: TicketPatch,
    ) -> Result<TicketChanges, InternalError> {
        let mut errors = ValidationError::new();
        let mut changes = TicketChanges {
            priority: patch.priority,
            category_id: patch.category,
            assigned_to: patch.assigned_to,
            ..Default::default()
        };

        if let Some(title) = patch.title.as_deref() {
            changes.title = validation::clean_title(&mut errors, Some(title));
        }
        if let Some(description) = patch.description.as_deref() {
            changes.description =
                validation::clean_required(&mut errors, "description", Some(description));
        }
        if let Some(Some(category_id)) = patch.category {
            self.check_category(conn, category_id, &mut errors).await?;
        }
        if let Some(status) = patch.status {
            let admin_override = access_control::is_admin(principal);
            match ticket_lifecycle::check_transition(ticket.status, status, admin_override) {
                Ok(()) => changes.status = Some(status),
                Err(rejected) => errors.fields.extend(rejected.fields),
            }
        }
        if let Some(Some(assignee_id)) = patch.assigned_to {
            self.check_assignee(conn, assignee_id, &mut errors).await?;
        }

        errors.into_result()?;
        Ok(changes)
    }

    async fn check_category(
        &self,
        conn: &impl ConnectionTrait,
        category_id: i32,
        errors: &mut ValidationError,
    ) -> Result<(), InternalError> {
        if self.category_store.find_by_id(conn, category_id).await?.is_none() {
            errors.add(
                "category",
                format!("Invalid pk \"{}\" - object does not exist.", category_id),
            );
        }
        Ok(())
    }

    async fn check_assignee(
        &self,
        conn: &impl ConnectionTrait,
        assignee_id: i32,
        errors: &mut ValidationError,
    ) -> Result<(), InternalError> {
        if self.user_store.find_by_id(conn, assignee_id).await?.is_none() {
            errors.add(
                "assigned_to",
                format!("Invalid pk \"{}\" - object does not exist.", assignee_id),
            );
        } else if !self.user_store.is_member(conn, assignee_id, Role::SupportTeam).await? {
            errors.add("assigned_to", "Tickets can only be assigned to Support Team members.");
        }
        Ok(())
    }

    /// Comments the caller may see, most recent first
    pub async fn list_comments(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
    ) -> Result<Vec<CommentDetails>, InternalError> {
        let principal = &ctx.principal;
        let ticket = self.ticket_store.get_by_id(&self.db, ticket_id).await?;
        access_control::authorize(
            principal,
            access_control::can_view_ticket(principal, &ticket),
            "you may only read comments on tickets you can view",
        )?;

        let details = self
            .ticket_store
            .load_one(&self.db, ticket, access_control::can_see_internal_comments(principal))
            .await?;
        Ok(details.comments)
    }

    /// Add a comment authored by the caller
    ///
    /// `is_internal` is only kept for authors who may see internal comments.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        draft: CommentDraft,
    ) -> Result<CommentDetails, InternalError> {
        let principal = &ctx.principal;
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        access_control::authorize(
            principal,
            access_control::can_comment_on_ticket(principal, &ticket),
            "you may only comment on tickets you can view",
        )?;

        let mut errors = ValidationError::new();
        let content = validation::clean_required(&mut errors, "content", draft.content.as_deref());
        errors.into_result()?;

        let is_internal = draft.is_internal.unwrap_or(false)
            && access_control::can_see_internal_comments(principal);
        let comment = self
            .comment_store
            .create(
                &txn,
                NewComment {
                    ticket_id: ticket.id,
                    author_id: principal.user_id,
                    content: content.unwrap_or_default(),
                    is_internal,
                },
            )
            .await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::debug!(ticket_id, comment_id = comment.id, is_internal, "Comment added");
        Ok(CommentDetails {
            comment,
            author_username: principal.username.clone(),
        })
    }
}
