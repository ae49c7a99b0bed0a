use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::ticket_comment;
use crate::types::now_millis;

/// Fields of a comment about to be inserted
#[derive(Debug, Clone)]
pub struct NewComment {
    pub ticket_id: i32,
    pub author_id: i32,
    pub content: String,
    pub is_internal: bool,
}

/// Comments attached to tickets
#[derive(Debug, Default)]
pub struct CommentStore;

impl CommentStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_comment: NewComment,
    ) -> Result<ticket_comment::Model, InternalError> {
        let now = now_millis();
        ticket_comment::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            ticket_id: Set(new_comment.ticket_id),
            author_id: Set(new_comment.author_id),
            content: Set(new_comment.content),
            is_internal: Set(new_comment.is_internal),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_comment", e))
    }

    /// Comments on the given tickets, most recent first
    ///
    /// Internal comments are dropped unless `include_internal` is set.
    pub async fn list_for_tickets(
        &self,
        conn: &impl ConnectionTrait,
        ticket_ids: impl IntoIterator<Item = i32>,
        include_internal: bool,
    ) -> Result<Vec<ticket_comment::Model>, InternalError> {
        let ticket_ids: Vec<i32> = ticket_ids.into_iter().collect();
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = ticket_comment::Entity::find()
            .filter(ticket_comment::Column::TicketId.is_in(ticket_ids));
        if !include_internal {
            query = query.filter(ticket_comment::Column::IsInternal.eq(false));
        }

        query
            .order_by_desc(ticket_comment::Column::CreatedAt)
            .order_by_desc(ticket_comment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_comments", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_ticket, create_user, setup_test_db};

    #[tokio::test]
    async fn test_internal_comments_are_filtered() {
        let db = setup_test_db().await;
        let author = create_user(&db, "alice", &[]).await;
        let ticket = create_ticket(&db, &author, "Printer jam").await;
        let store = CommentStore::new();

        for (content, is_internal) in [("public", false), ("staff only", true)] {
            store
                .create(
                    &db,
                    NewComment {
                        ticket_id: ticket.id,
                        author_id: author.id,
                        content: content.to_string(),
                        is_internal,
                    },
                )
                .await
                .unwrap();
        }

        let all = store.list_for_tickets(&db, [ticket.id], true).await.unwrap();
        let public = store.list_for_tickets(&db, [ticket.id], false).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].content, "public");
    }

    #[tokio::test]
    async fn test_comments_are_newest_first() {
        let db = setup_test_db().await;
        let author = create_user(&db, "alice", &[]).await;
        let ticket = create_ticket(&db, &author, "Printer jam").await;
        let store = CommentStore::new();

        for content in ["first", "second", "third"] {
            store
                .create(
                    &db,
                    NewComment {
                        ticket_id: ticket.id,
                        author_id: author.id,
                        content: content.to_string(),
                        is_internal: false,
                    },
                )
                .await
                .unwrap();
        }

        let contents: Vec<String> = store
            .list_for_tickets(&db, [ticket.id], false)
            .await
            .unwrap()
            .into_iter()
            .map(|comment| comment.content)
            .collect();

        assert_eq!(contents, vec!["third", "second", "first"]);
    }
}
