// CLI module for administrative operations requiring server access

pub mod migrate;
pub mod superuser;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Help desk backend CLI
#[derive(Parser)]
#[command(name = "helpdesk-backend")]
#[command(about = "Help desk ticketing backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create a superuser with a generated password
    CreateSuperuser {
        /// Login name of the new account
        #[arg(long)]
        username: String,

        /// Optional email address
        #[arg(long)]
        email: Option<String>,
    },
}

/// Execute a CLI command that needs the full application data
///
/// `Serve` and `Migrate` are handled by main before AppData exists.
pub async fn execute_command(
    command: Commands,
    app_data: std::sync::Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::CreateSuperuser { username, email } => {
            superuser::create_superuser(app_data, &username, email).await?;
        }
        Commands::Serve | Commands::Migrate => {}
    }

    Ok(())
}
