use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{ResourceKind, ValidationError};
use crate::services::{access_control, crypto, validation};
use crate::stores::ticket_store::TicketChanges;
use crate::stores::user_store::{NewUser, UserChanges};
use crate::stores::{CategoryStore, CredentialStore, TicketStore, UserStore};
use crate::types::db::{category, user};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{
    DashboardSummary, Principal, Role, TicketDetails, UserDetails, UserDraft, UserPatch,
};

const RECENT_TICKETS: u64 = 5;

/// Orchestrates the administration workflows: dashboard, users,
/// categories and ticket assignment
pub struct AdminCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    credential_store: Arc<CredentialStore>,
    category_store: Arc<CategoryStore>,
    ticket_store: Arc<TicketStore>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            credential_store: app_data.credential_store.clone(),
            category_store: app_data.category_store.clone(),
            ticket_store: app_data.ticket_store.clone(),
        }
    }

    fn require_admin(principal: &Principal, allowed: bool) -> Result<(), InternalError> {
        access_control::authorize(principal, allowed, "administrator access required")?;
        Ok(())
    }

    fn require_superuser(principal: &Principal) -> Result<(), InternalError> {
        access_control::authorize(
            principal,
            access_control::can_manage_users(principal),
            "only superusers may manage user accounts",
        )?;
        Ok(())
    }

    pub async fn dashboard(&self, ctx: &RequestContext) -> Result<DashboardSummary, InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_view_dashboard(principal))?;

        let recent = self.ticket_store.recent(&self.db, RECENT_TICKETS).await?;
        let recent_tickets = self
            .ticket_store
            .load_details(&self.db, recent, access_control::can_see_internal_comments(principal))
            .await?;

        Ok(DashboardSummary {
            total_tickets: self.ticket_store.count(&self.db).await?,
            tickets_by_status: self.ticket_store.count_by_status(&self.db).await?,
            tickets_by_priority: self.ticket_store.count_by_priority(&self.db).await?,
            unassigned_tickets: self.ticket_store.count_unassigned(&self.db).await?,
            total_users: self.user_store.count_users(&self.db).await?,
            support_team_count: self.user_store.count_members(&self.db, Role::SupportTeam).await?,
            total_categories: self.category_store.count(&self.db).await?,
            recent_tickets,
        })
    }

    // Users

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserDetails>, InternalError> {
        Self::require_superuser(&ctx.principal)?;
        self.user_store.list_users(&self.db).await
    }

    pub async fn get_user(&self, ctx: &RequestContext, user_id: i32) -> Result<UserDetails, InternalError> {
        Self::require_superuser(&ctx.principal)?;
        let user = self.user_store.get_by_id(&self.db, user_id).await?;
        self.user_store.details(&self.db, user).await
    }

    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        draft: UserDraft,
    ) -> Result<UserDetails, InternalError> {
        Self::require_superuser(&ctx.principal)?;

        let mut errors = ValidationError::new();
        let username = validation::clean_username(&mut errors, draft.username.as_deref());
        let password = validation::check_password(&mut errors, draft.password.as_deref());
        errors.into_result()?;

        // Hash outside the transaction, it is the slow part
        let password_hash = self
            .credential_store
            .hash_password(&password.unwrap_or_default())?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let groups = match &draft.groups {
            Some(names) => self.user_store.resolve_groups(&txn, names).await?,
            None => Vec::new(),
        };
        let created = self
            .user_store
            .create_user(
                &txn,
                NewUser {
                    username: username.unwrap_or_default(),
                    password_hash,
                    email: draft.email.unwrap_or_default(),
                    first_name: draft.first_name.unwrap_or_default(),
                    last_name: draft.last_name.unwrap_or_default(),
                    is_staff: draft.is_staff.unwrap_or(false),
                    is_superuser: draft.is_superuser.unwrap_or(false),
                },
            )
            .await?;
        self.user_store.set_groups(&txn, created.id, &groups).await?;
        let details = self.user_store.details(&txn, created).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(
            user_id = details.user.id,
            username = %details.user.username,
            actor_id = ctx.actor_id(),
            "User created"
        );
        Ok(details)
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        patch: UserPatch,
    ) -> Result<UserDetails, InternalError> {
        Self::require_superuser(&ctx.principal)?;
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let existing = self.user_store.get_by_id(&txn, user_id).await?;
        let groups = match &patch.groups {
            Some(names) => Some(self.user_store.resolve_groups(&txn, names).await?),
            None => None,
        };

        let updated = self
            .user_store
            .update_user(
                &txn,
                existing,
                UserChanges {
                    email: patch.email,
                    first_name: patch.first_name,
                    last_name: patch.last_name,
                    is_staff: patch.is_staff,
                    is_superuser: patch.is_superuser,
                },
            )
            .await?;
        if let Some(groups) = groups {
            self.user_store.set_groups(&txn, user_id, &groups).await?;
        }
        let details = self.user_store.details(&txn, updated).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(details)
    }

    /// Delete an account with everything it owns
    ///
    /// A superuser cannot delete the account they are signed in with.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i32) -> Result<(), InternalError> {
        let principal = &ctx.principal;
        Self::require_superuser(principal)?;
        if principal.user_id == user_id {
            return Err(ValidationError::field("id", "You cannot delete your own account.").into());
        }

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        self.user_store.get_by_id(&txn, user_id).await?;
        self.user_store.delete_user(&txn, user_id).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(user_id, actor_id = principal.user_id, "User deleted");
        Ok(())
    }

    /// Create a superuser outside of any request, for the CLI
    ///
    /// Returns the account and its generated password.
    pub async fn bootstrap_superuser(
        &self,
        username: &str,
        email: Option<String>,
    ) -> Result<(user::Model, String), InternalError> {
        let mut errors = ValidationError::new();
        let username = validation::clean_username(&mut errors, Some(username));
        errors.into_result()?;

        let password = crypto::generate_secure_password();
        let password_hash = self.credential_store.hash_password(&password)?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let created = self
            .user_store
            .create_user(
                &txn,
                NewUser {
                    username: username.unwrap_or_default(),
                    password_hash,
                    email: email.unwrap_or_default(),
                    is_staff: true,
                    is_superuser: true,
                    ..Default::default()
                },
            )
            .await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(user_id = created.id, "Superuser created");
        Ok((created, password))
    }

    // Categories

    pub async fn list_categories(&self, ctx: &RequestContext) -> Result<Vec<category::Model>, InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_manage_categories(principal))?;
        self.category_store.list(&self.db).await
    }

    pub async fn create_category(
        &self,
        ctx: &RequestContext,
        name: Option<String>,
    ) -> Result<category::Model, InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_manage_categories(principal))?;

        let mut errors = ValidationError::new();
        let name = validation::clean_category_name(&mut errors, name.as_deref());
        errors.into_result()?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let created = self.category_store.create(&txn, name.unwrap_or_default()).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(created)
    }

    pub async fn rename_category(
        &self,
        ctx: &RequestContext,
        category_id: i32,
        name: Option<String>,
    ) -> Result<category::Model, InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_manage_categories(principal))?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let existing = self.category_store.get_by_id(&txn, category_id).await?;

        let mut errors = ValidationError::new();
        let name = validation::clean_category_name(&mut errors, name.as_deref());
        errors.into_result()?;

        let renamed = self
            .category_store
            .rename(&txn, existing, name.unwrap_or_default())
            .await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(renamed)
    }

    /// Delete a category; its tickets stay, uncategorized
    pub async fn delete_category(&self, ctx: &RequestContext, category_id: i32) -> Result<(), InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_manage_categories(principal))?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let detached = self.category_store.delete(&txn, category_id).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(category_id, detached_tickets = detached, "Category deleted");
        Ok(())
    }

    // Assignments

    pub async fn list_unassigned(&self, ctx: &RequestContext) -> Result<Vec<TicketDetails>, InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_manage_assignments(principal))?;

        let tickets = self.ticket_store.list_unassigned(&self.db).await?;
        self.ticket_store
            .load_details(&self.db, tickets, access_control::can_see_internal_comments(principal))
            .await
    }

    /// Assign a ticket to a Support Team member
    pub async fn assign_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        assigned_to: Option<i32>,
    ) -> Result<TicketDetails, InternalError> {
        let principal = &ctx.principal;
        Self::require_admin(principal, access_control::can_manage_assignments(principal))?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        let Some(assignee_id) = assigned_to else {
            return Err(ValidationError::field("assigned_to", "This field is required.").into());
        };
        self.user_store
            .find_by_id(&txn, assignee_id)
            .await?
            .ok_or_else(|| InternalError::not_found(ResourceKind::User, assignee_id))?;
        if !self.user_store.is_member(&txn, assignee_id, Role::SupportTeam).await? {
            return Err(ValidationError::field(
                "assigned_to",
                "Tickets can only be assigned to Support Team members.",
            )
            .into());
        }

        let updated = self
            .ticket_store
            .update(
                &txn,
                ticket,
                TicketChanges {
                    assigned_to: Some(Some(assignee_id)),
                    ..Default::default()
                },
            )
            .await?;
        let details = self
            .ticket_store
            .load_one(&txn, updated, access_control::can_see_internal_comments(principal))
            .await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(ticket_id, assignee_id, actor_id = principal.user_id, "Ticket assigned");
        Ok(details)
    }
}
