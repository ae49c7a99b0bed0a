// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{MockEnvironment, Settings};
use crate::stores::user_store::NewUser;
use crate::stores::ticket_store::NewTicket;
use crate::stores::{CommentStore, CredentialStore, TicketStore, UserStore};
use crate::types::db::{ticket, user};
use crate::types::internal::{RequestContext, TicketPriority};

pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";
const TEST_JWT_SECRET: &str = "test-jwt-secret-that-is-at-least-32-chars";
const TEST_REFRESH_SECRET: &str = "test-refresh-secret-at-least-32-characters";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings built from a mock environment with valid secrets
pub fn setup_test_settings() -> Settings {
    let env = MockEnvironment::empty().with_vars(&[
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("REFRESH_TOKEN_SECRET", TEST_REFRESH_SECRET),
        ("PASSWORD_PEPPER", TEST_PEPPER),
    ]);

    Settings::from_env_provider(&env).expect("Failed to load test settings")
}

/// Full application data over a fresh in-memory database
pub async fn setup_test_app() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::init(db, &setup_test_settings()))
}

/// Insert a user with `TEST_PASSWORD` and the given group memberships
pub async fn create_user(db: &DatabaseConnection, username: &str, groups: &[&str]) -> user::Model {
    let users = UserStore::new();
    let password_hash = CredentialStore::new(TEST_PEPPER.to_string())
        .hash_password(TEST_PASSWORD)
        .expect("Failed to hash password");

    let created = users
        .create_user(
            db,
            NewUser {
                username: username.to_string(),
                password_hash,
                email: format!("{}@example.com", username),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create user");

    let names: Vec<String> = groups.iter().map(|name| name.to_string()).collect();
    let groups = users
        .resolve_groups(db, &names)
        .await
        .expect("Unknown test group");
    users
        .set_groups(db, created.id, &groups)
        .await
        .expect("Failed to set groups");

    created
}

/// Insert an open, unassigned, medium priority ticket
pub async fn create_ticket(db: &DatabaseConnection, author: &user::Model, title: &str) -> ticket::Model {
    ticket_store()
        .create(
            db,
            NewTicket {
                title: title.to_string(),
                description: format!("{} description", title),
                category_id: None,
                priority: TicketPriority::Medium,
                created_by: author.id,
            },
        )
        .await
        .expect("Failed to create ticket")
}

pub fn ticket_store() -> TicketStore {
    TicketStore::new(Arc::new(UserStore::new()), Arc::new(CommentStore::new()))
}

/// Request context acting as `user`, with roles loaded from the database
pub async fn context_for(app: &Arc<AppData>, user: &user::Model) -> RequestContext {
    let principal = app
        .user_store
        .load_principal(&app.db, user.id)
        .await
        .expect("Failed to load principal")
        .expect("User does not exist");

    RequestContext::new(principal)
}
