use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::Expr,
};

use crate::errors::InternalError;
use crate::errors::internal::ResourceKind;
use crate::types::db::{category, ticket};

/// Registry of ticket categories
#[derive(Debug, Default)]
pub struct CategoryStore;

impl CategoryStore {
    pub fn new() -> Self {
        Self
    }

    /// All categories, alphabetical
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<category::Model>, InternalError> {
        category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_categories", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        category_id: i32,
    ) -> Result<Option<category::Model>, InternalError> {
        category::Entity::find_by_id(category_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_category", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        category_id: i32,
    ) -> Result<category::Model, InternalError> {
        self.find_by_id(conn, category_id)
            .await?
            .ok_or_else(|| InternalError::not_found(ResourceKind::Category, category_id))
    }

    async fn ensure_name_free(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        except_id: Option<i32>,
    ) -> Result<(), InternalError> {
        let mut query = category::Entity::find().filter(category::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(category::Column::Id.ne(id));
        }

        let taken = query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("check_category_name", e))?;
        if taken > 0 {
            return Err(InternalError::conflict(ResourceKind::Category, name));
        }
        Ok(())
    }

    /// Create a category; names are unique
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        name: String,
    ) -> Result<category::Model, InternalError> {
        self.ensure_name_free(conn, &name, None).await?;

        category::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(name),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_category", e))
    }

    pub async fn rename(
        &self,
        conn: &impl ConnectionTrait,
        existing: category::Model,
        name: String,
    ) -> Result<category::Model, InternalError> {
        self.ensure_name_free(conn, &name, Some(existing.id)).await?;

        let mut model: category::ActiveModel = existing.into();
        model.name = Set(name);
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("rename_category", e))
    }

    /// Delete a category, detaching it from its tickets first
    ///
    /// Returns how many tickets lost their category.
    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        category_id: i32,
    ) -> Result<u64, InternalError> {
        let detached = ticket::Entity::update_many()
            .col_expr(ticket::Column::CategoryId, Expr::value(Option::<i32>::None))
            .filter(ticket::Column::CategoryId.eq(category_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("detach_category", e))?;

        let result = category::Entity::delete_by_id(category_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_category", e))?;
        if result.rows_affected == 0 {
            return Err(InternalError::not_found(ResourceKind::Category, category_id));
        }

        Ok(detached.rows_affected)
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        category::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_categories", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::ResourceError;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_duplicate_category_name_conflicts() {
        let db = setup_test_db().await;
        let store = CategoryStore::new();
        store.create(&db, "Hardware".to_string()).await.unwrap();

        let result = store.create(&db, "Hardware".to_string()).await;

        assert!(matches!(
            result,
            Err(InternalError::Resource(ResourceError::Conflict { kind: ResourceKind::Category, .. }))
        ));
        assert_eq!(store.count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let db = setup_test_db().await;
        let store = CategoryStore::new();
        let hardware = store.create(&db, "Hardware".to_string()).await.unwrap();

        let renamed = store.rename(&db, hardware, "Hardware".to_string()).await.unwrap();

        assert_eq!(renamed.name, "Hardware");
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_conflicts() {
        let db = setup_test_db().await;
        let store = CategoryStore::new();
        store.create(&db, "Hardware".to_string()).await.unwrap();
        let software = store.create(&db, "Software".to_string()).await.unwrap();

        let result = store.rename(&db, software, "Hardware".to_string()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_is_alphabetical() {
        let db = setup_test_db().await;
        let store = CategoryStore::new();
        for name in ["Software", "Access", "Hardware"] {
            store.create(&db, name.to_string()).await.unwrap();
        }

        let names: Vec<String> = store.list(&db).await.unwrap().into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["Access", "Hardware", "Software"]);
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let db = setup_test_db().await;

        let result = CategoryStore::new().delete(&db, 77).await;

        assert!(matches!(
            result,
            Err(InternalError::Resource(ResourceError::NotFound { .. }))
        ));
    }
}
