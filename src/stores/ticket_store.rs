use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Iterable, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
    sea_query::Expr,
};

use crate::errors::InternalError;
use crate::errors::internal::ResourceKind;
use crate::services::TicketScope;
use crate::stores::{CommentStore, UserStore};
use crate::types::db::ticket;
use crate::types::internal::{CommentDetails, TicketDetails, TicketPriority, TicketStatus};
use crate::types::now_millis;

/// Fields of a ticket about to be inserted
///
/// Status and assignee are not part of it: new tickets always start open
/// and unassigned.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub priority: TicketPriority,
    pub created_by: i32,
}

/// Partial ticket update, `None` leaves a field untouched
///
/// The nested options distinguish "clear" (`Some(None)`) from "keep" (`None`).
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Option<i32>>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<Option<i32>>,
}

pub struct TicketStore {
    users: Arc<UserStore>,
    comments: Arc<CommentStore>,
}

impl TicketStore {
    pub fn new(users: Arc<UserStore>, comments: Arc<CommentStore>) -> Self {
        Self { users, comments }
    }

    fn newest_first(query: Select<ticket::Entity>) -> Select<ticket::Entity> {
        query
            .order_by_desc(ticket::Column::CreatedAt)
            .order_by_desc(ticket::Column::Id)
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_ticket: NewTicket,
    ) -> Result<ticket::Model, InternalError> {
        let now = now_millis();
        ticket::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            title: Set(new_ticket.title),
            description: Set(new_ticket.description),
            category_id: Set(new_ticket.category_id),
            priority: Set(new_ticket.priority),
            status: Set(TicketStatus::Open),
            created_by: Set(new_ticket.created_by),
            assigned_to: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_ticket", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
    ) -> Result<Option<ticket::Model>, InternalError> {
        ticket::Entity::find_by_id(ticket_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_ticket", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
    ) -> Result<ticket::Model, InternalError> {
        self.find_by_id(conn, ticket_id)
            .await?
            .ok_or_else(|| InternalError::not_found(ResourceKind::Ticket, ticket_id))
    }

    /// Tickets visible under `scope`, newest first
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        scope: TicketScope,
    ) -> Result<Vec<ticket::Model>, InternalError> {
        let query = match scope {
            TicketScope::All => ticket::Entity::find(),
            TicketScope::AssignedTo(user_id) => {
                ticket::Entity::find().filter(ticket::Column::AssignedTo.eq(user_id))
            }
            TicketScope::CreatedBy(user_id) => {
                ticket::Entity::find().filter(ticket::Column::CreatedBy.eq(user_id))
            }
        };

        Self::newest_first(query)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_tickets", e))
    }

    pub async fn list_unassigned(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<ticket::Model>, InternalError> {
        Self::newest_first(ticket::Entity::find().filter(ticket::Column::AssignedTo.is_null()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_unassigned_tickets", e))
    }

    pub async fn recent(
        &self,
        conn: &impl ConnectionTrait,
        limit: u64,
    ) -> Result<Vec<ticket::Model>, InternalError> {
        Self::newest_first(ticket::Entity::find())
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_recent_tickets", e))
    }

    /// Apply changes; `updated_at` always moves forward
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: ticket::Model,
        changes: TicketChanges,
    ) -> Result<ticket::Model, InternalError> {
        let previous_update = existing.updated_at;
        let mut model: ticket::ActiveModel = existing.into();

        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }
        if let Some(category_id) = changes.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(priority) = changes.priority {
            model.priority = Set(priority);
        }
        if let Some(status) = changes.status {
            model.status = Set(status);
        }
        if let Some(assigned_to) = changes.assigned_to {
            model.assigned_to = Set(assigned_to);
        }
        model.updated_at = Set(now_millis().max(previous_update + 1));

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_ticket", e))
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        ticket::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_tickets", e))
    }

    pub async fn count_unassigned(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        ticket::Entity::find()
            .filter(ticket::Column::AssignedTo.is_null())
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_unassigned_tickets", e))
    }

    /// Ticket counts per status; every status is present, zero included
    pub async fn count_by_status(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<BTreeMap<String, u64>, InternalError> {
        let rows: Vec<(TicketStatus, i64)> = ticket::Entity::find()
            .select_only()
            .column(ticket::Column::Status)
            .column_as(Expr::col(ticket::Column::Id).count(), "count")
            .group_by(ticket::Column::Status)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("count_tickets_by_status", e))?;

        let mut counts: BTreeMap<String, u64> = TicketStatus::iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for (status, count) in rows {
            counts.insert(status.to_string(), count.max(0) as u64);
        }
        Ok(counts)
    }

    /// Ticket counts per priority; every priority is present, zero included
    pub async fn count_by_priority(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<BTreeMap<String, u64>, InternalError> {
        let rows: Vec<(TicketPriority, i64)> = ticket::Entity::find()
            .select_only()
            .column(ticket::Column::Priority)
            .column_as(Expr::col(ticket::Column::Id).count(), "count")
            .group_by(ticket::Column::Priority)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("count_tickets_by_priority", e))?;

        let mut counts: BTreeMap<String, u64> = TicketPriority::iter()
            .map(|priority| (priority.to_string(), 0))
            .collect();
        for (priority, count) in rows {
            counts.insert(priority.to_string(), count.max(0) as u64);
        }
        Ok(counts)
    }

    /// Join tickets with usernames and their visible comments
    pub async fn load_details(
        &self,
        conn: &impl ConnectionTrait,
        tickets: Vec<ticket::Model>,
        include_internal: bool,
    ) -> Result<Vec<TicketDetails>, InternalError> {
        let comments = self
            .comments
            .list_for_tickets(conn, tickets.iter().map(|t| t.id), include_internal)
            .await?;

        let user_ids = tickets
            .iter()
            .flat_map(|t| std::iter::once(t.created_by).chain(t.assigned_to))
            .chain(comments.iter().map(|c| c.author_id));
        let usernames = self.users.usernames_for(conn, user_ids).await?;
        let username = |id: i32| usernames.get(&id).cloned().unwrap_or_default();

        let mut by_ticket: HashMap<i32, Vec<CommentDetails>> = HashMap::new();
        for comment in comments {
            by_ticket.entry(comment.ticket_id).or_default().push(CommentDetails {
                author_username: username(comment.author_id),
                comment,
            });
        }

        Ok(tickets
            .into_iter()
            .map(|ticket| TicketDetails {
                created_by_username: username(ticket.created_by),
                assigned_to_username: ticket.assigned_to.map(username),
                comments: by_ticket.remove(&ticket.id).unwrap_or_default(),
                ticket,
            })
            .collect())
    }

    pub async fn load_one(
        &self,
        conn: &impl ConnectionTrait,
        ticket: ticket::Model,
        include_internal: bool,
    ) -> Result<TicketDetails, InternalError> {
        let ticket_id = ticket.id;
        self.load_details(conn, vec![ticket], include_internal)
            .await?
            .pop()
            .ok_or_else(|| InternalError::not_found(ResourceKind::Ticket, ticket_id))
    }
}

impl std::fmt::Debug for TicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketStore").finish_non_exhaustive()
    }
}
