use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::Expr,
};

use crate::errors::InternalError;
use crate::errors::internal::{ResourceKind, ValidationError};
use crate::types::db::{group, refresh_token, ticket, ticket_comment, user, user_group};
use crate::types::internal::{Principal, Role, UserDetails};
use crate::types::now_millis;

/// Fields of a user about to be inserted
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Partial profile update, `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Users, groups and their memberships
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(ResourceKind::User, user_id))
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// Insert a user; a taken username is a conflict
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser,
    ) -> Result<user::Model, InternalError> {
        if self.find_by_username(conn, &new_user.username).await?.is_some() {
            return Err(InternalError::conflict(ResourceKind::User, new_user.username));
        }

        let now = now_millis();
        let model = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            is_staff: Set(new_user.is_staff),
            is_superuser: Set(new_user.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_user", e))
    }

    pub async fn update_user(
        &self,
        conn: &impl ConnectionTrait,
        existing: user::Model,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        let previous_update = existing.updated_at;
        let mut model: user::ActiveModel = existing.into();

        if let Some(email) = changes.email {
            model.email = Set(email);
        }
        if let Some(first_name) = changes.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(is_staff) = changes.is_staff {
            model.is_staff = Set(is_staff);
        }
        if let Some(is_superuser) = changes.is_superuser {
            model.is_superuser = Set(is_superuser);
        }
        model.updated_at = Set(now_millis().max(previous_update + 1));

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    /// Delete a user and everything that hangs off them
    ///
    /// Their tickets (with those tickets' comments), their own comments,
    /// memberships and refresh tokens go; tickets assigned to them are
    /// left unassigned.
    pub async fn delete_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<(), InternalError> {
        let owned_ticket_ids: Vec<i32> = ticket::Entity::find()
            .filter(ticket::Column::CreatedBy.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_owned_tickets", e))?
            .into_iter()
            .map(|ticket| ticket.id)
            .collect();

        ticket_comment::Entity::delete_many()
            .filter(
                ticket_comment::Column::AuthorId
                    .eq(user_id)
                    .or(ticket_comment::Column::TicketId.is_in(owned_ticket_ids.clone())),
            )
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_comments", e))?;

        ticket::Entity::delete_many()
            .filter(ticket::Column::Id.is_in(owned_ticket_ids))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_tickets", e))?;

        ticket::Entity::update_many()
            .col_expr(ticket::Column::AssignedTo, Expr::value(Option::<i32>::None))
            .filter(ticket::Column::AssignedTo.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("unassign_user_tickets", e))?;

        user_group::Entity::delete_many()
            .filter(user_group::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_memberships", e))?;

        refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_refresh_tokens", e))?;

        let result = user::Entity::delete_by_id(user_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found(ResourceKind::User, user_id));
        }
        Ok(())
    }

    /// Resolve group names to rows; any unknown name fails the `groups` field
    pub async fn resolve_groups(
        &self,
        conn: &impl ConnectionTrait,
        names: &[String],
    ) -> Result<Vec<group::Model>, InternalError> {
        let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let found = group::Entity::find()
            .filter(group::Column::Name.is_in(wanted.iter().copied()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("resolve_groups", e))?;

        let mut errors = ValidationError::new();
        for name in &wanted {
            if !found.iter().any(|group| group.name == *name) {
                errors.add("groups", format!("Group '{}' does not exist.", name));
            }
        }
        errors.into_result()?;

        Ok(found)
    }

    /// Replace the user's memberships with exactly `groups`
    pub async fn set_groups(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        groups: &[group::Model],
    ) -> Result<(), InternalError> {
        user_group::Entity::delete_many()
            .filter(user_group::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_user_groups", e))?;

        if groups.is_empty() {
            return Ok(());
        }

        let memberships = groups.iter().map(|group| user_group::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group.id),
        });
        user_group::Entity::insert_many(memberships)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_groups", e))?;

        Ok(())
    }

    /// Group names of a user, sorted
    pub async fn group_names(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Vec<String>, InternalError> {
        Ok(self
            .group_names_for(conn, [user_id])
            .await?
            .remove(&user_id)
            .unwrap_or_default())
    }

    /// Group names for several users in one query
    pub async fn group_names_for(
        &self,
        conn: &impl ConnectionTrait,
        user_ids: impl IntoIterator<Item = i32>,
    ) -> Result<HashMap<i32, Vec<String>>, InternalError> {
        let user_ids: Vec<i32> = user_ids.into_iter().collect();
        let rows = user_group::Entity::find()
            .filter(user_group::Column::UserId.is_in(user_ids))
            .find_also_related(group::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_user_groups", e))?;

        let mut by_user: HashMap<i32, Vec<String>> = HashMap::new();
        for (membership, group) in rows {
            if let Some(group) = group {
                by_user.entry(membership.user_id).or_default().push(group.name);
            }
        }
        for names in by_user.values_mut() {
            names.sort();
        }
        Ok(by_user)
    }

    pub async fn is_member(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        role: Role,
    ) -> Result<bool, InternalError> {
        let names = self.group_names(conn, user_id).await?;
        Ok(names.iter().any(|name| name == role.group_name()))
    }

    pub async fn count_users(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    /// Number of users in the group behind `role`
    pub async fn count_members(
        &self,
        conn: &impl ConnectionTrait,
        role: Role,
    ) -> Result<u64, InternalError> {
        let Some(group) = group::Entity::find()
            .filter(group::Column::Name.eq(role.group_name()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_group", e))?
        else {
            return Ok(0);
        };

        user_group::Entity::find()
            .filter(user_group::Column::GroupId.eq(group.id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_group_members", e))
    }

    /// All users with their groups, ordered by id
    pub async fn list_users(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<UserDetails>, InternalError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))?;

        let mut groups = self.group_names_for(conn, users.iter().map(|u| u.id)).await?;
        Ok(users
            .into_iter()
            .map(|user| UserDetails {
                groups: groups.remove(&user.id).unwrap_or_default(),
                user,
            })
            .collect())
    }

    pub async fn details(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
    ) -> Result<UserDetails, InternalError> {
        let groups = self.group_names(conn, user.id).await?;
        Ok(UserDetails { user, groups })
    }

    /// Build the principal for a user id, `None` if the user is gone
    pub async fn load_principal(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<Principal>, InternalError> {
        let Some(user) = self.find_by_id(conn, user_id).await? else {
            return Ok(None);
        };
        let groups = self.group_names(conn, user.id).await?;

        Ok(Some(Principal::new(
            user.id,
            user.username,
            user.is_superuser,
            user.is_staff,
            groups,
        )))
    }

    /// Usernames keyed by id; ids that do not exist are skipped
    pub async fn usernames_for(
        &self,
        conn: &impl ConnectionTrait,
        user_ids: impl IntoIterator<Item = i32>,
    ) -> Result<HashMap<i32, String>, InternalError> {
        let user_ids: BTreeSet<i32> = user_ids.into_iter().collect();
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_usernames", e))?;

        Ok(users.into_iter().map(|user| (user.id, user.username)).collect())
    }
}
