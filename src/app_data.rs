use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::TokenService;
use crate::stores::{CategoryStore, CommentStore, CredentialStore, TicketStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ token_service (Arc<TokenService>)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ user_store / category_store / comment_store (Arc<_>)
///   └─ ticket_store (Arc<TicketStore>, shares user and comment stores)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   ├─ AuthCoordinator::new(app_data)
///   ├─ TicketCoordinator::new(app_data)
///   └─ AdminCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub token_service: Arc<TokenService>,
    pub credential_store: Arc<CredentialStore>,
    pub user_store: Arc<UserStore>,
    pub category_store: Arc<CategoryStore>,
    pub comment_store: Arc<CommentStore>,
    pub ticket_store: Arc<TicketStore>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Self {
        tracing::info!("Initializing AppData...");
        let secrets = settings.secrets();

        let token_service = Arc::new(TokenService::new(
            secrets.jwt_secret().to_string(),
            secrets.refresh_token_secret().to_string(),
            settings.access_token_minutes(),
            settings.refresh_token_days(),
        ));
        let credential_store = Arc::new(CredentialStore::new(
            secrets.password_pepper().to_string(),
        ));

        let user_store = Arc::new(UserStore::new());
        let category_store = Arc::new(CategoryStore::new());
        let comment_store = Arc::new(CommentStore::new());
        let ticket_store = Arc::new(TicketStore::new(user_store.clone(), comment_store.clone()));

        tracing::debug!("Stores created");

        Self {
            db,
            token_service,
            credential_store,
            user_store,
            category_store,
            comment_store,
            ticket_store,
        }
    }
}
