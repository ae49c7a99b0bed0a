// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod tickets;


use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

pub use admin::AdminApi;
pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use tickets::TicketsApi;

use crate::app_data::AppData;

/// Compose every API under `/api` and the Swagger UI under `/swagger`
pub fn build_routes(app_data: Arc<AppData>, server_url: &str) -> Route {
    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(app_data.clone()),
            TicketsApi::new(app_data.clone()),
            AdminApi::new(app_data),
        ),
        "Help Desk API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
