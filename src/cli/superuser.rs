use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::AdminCoordinator;

/// Create a superuser and print its generated password once
pub async fn create_superuser(
    app_data: Arc<AppData>,
    username: &str,
    email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (user, password) = AdminCoordinator::new(app_data)
        .bootstrap_superuser(username, email)
        .await?;

    println!("\n=== Superuser created ===\n");
    println!("Username: {}", user.username);
    println!("Password: {}", password);
    println!("\nStore this password now; it will not be shown again.");

    Ok(())
}
