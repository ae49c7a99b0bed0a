// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use helpdesk_backend::AppData;
use helpdesk_backend::api::build_routes;
use helpdesk_backend::config::{MockEnvironment, Settings};
use helpdesk_backend::stores::user_store::{NewUser, UserChanges};
use helpdesk_backend::stores::{CredentialStore, UserStore};
use helpdesk_backend::types::db::user;
use migration::{Migrator, MigratorTrait};
use poem::Route;
use poem::test::{TestClient, TestResponse};
use sea_orm::Database;
use serde_json::{Value, json};

pub const PASSWORD: &str = "integration-password";
const PEPPER: &str = "integration-test-pepper";

pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub client: TestClient<Route>,
}

/// Fresh in-memory database, migrated, behind the full route tree
pub async fn setup_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let env = MockEnvironment::empty().with_vars(&[
        ("JWT_SECRET", "integration-jwt-secret-at-least-32-characters"),
        ("REFRESH_TOKEN_SECRET", "integration-refresh-secret-at-least-32-chars"),
        ("PASSWORD_PEPPER", PEPPER),
    ]);
    let settings = Settings::from_env_provider(&env).expect("Failed to load settings");

    let app_data = Arc::new(AppData::init(db, &settings));
    let client = TestClient::new(build_routes(app_data.clone(), "http://localhost:3000/api"));

    TestApp { app_data, client }
}

impl TestApp {
    /// Insert a user with `PASSWORD` and the given groups
    pub async fn user(&self, username: &str, groups: &[&str]) -> user::Model {
        let users = UserStore::new();
        let password_hash = CredentialStore::new(PEPPER.to_string())
            .hash_password(PASSWORD)
            .expect("Failed to hash password");

        let created = users
            .create_user(
                &self.app_data.db,
                NewUser {
                    username: username.to_string(),
                    password_hash,
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to create user");

        let names: Vec<String> = groups.iter().map(|name| name.to_string()).collect();
        let groups = users
            .resolve_groups(&self.app_data.db, &names)
            .await
            .expect("Unknown group");
        users
            .set_groups(&self.app_data.db, created.id, &groups)
            .await
            .expect("Failed to set groups");

        created
    }

    pub async fn superuser(&self, username: &str) -> user::Model {
        let created = self.user(username, &[]).await;
        UserStore::new()
            .update_user(
                &self.app_data.db,
                created,
                UserChanges {
                    is_staff: Some(true),
                    is_superuser: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to promote user")
    }

    /// Log in through the token endpoint and return the access token
    pub async fn token(&self, username: &str) -> String {
        let resp = self
            .client
            .post("/api/auth/token")
            .body_json(&json!({ "username": username, "password": PASSWORD }))
            .send()
            .await;
        resp.assert_status_is_ok();

        body(resp).await["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub async fn body(resp: TestResponse) -> Value {
    resp.0
        .into_body()
        .into_json()
        .await
        .expect("response body is not JSON")
}
