use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use helpdesk_backend::AppData;
use helpdesk_backend::api::build_routes;
use helpdesk_backend::cli::{self, Cli, Commands};
use helpdesk_backend::config::{Settings, init_database, init_logging, migrate_database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let command = cli.command.unwrap_or(Commands::Serve);
    if let Commands::Migrate = command {
        return cli::migrate::run_migrations(&settings).await;
    }

    let db = init_database(settings.database_url()).await?;
    migrate_database(&db).await?;
    tracing::info!("Database ready");

    let app_data = Arc::new(AppData::init(db, &settings));

    match command {
        Commands::Serve => serve(app_data, &settings).await?,
        other => cli::execute_command(other, app_data).await?,
    }

    Ok(())
}

async fn serve(app_data: Arc<AppData>, settings: &Settings) -> Result<(), std::io::Error> {
    let address = settings.server_address();
    let server_url = format!("http://localhost:{}/api", settings.server_port());
    let app = build_routes(app_data, &server_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger", settings.server_port());

    Server::new(TcpListener::bind(address)).run(app).await
}
