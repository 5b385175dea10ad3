use anyhow::{Context, Result};

use devtrack_lib::accounts::AccountView;

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &App, username: &str, format: &OutputFormat) -> Result<()> {
    let account = app
        .accounts
        .find_by_username(username)
        .await?
        .with_context(|| format!("User '{}' not found", username))?;

    let updated = app.accounts.set_active(account.id, !account.is_active).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&AccountView::from(updated))?);
        }
        OutputFormat::Plain => {
            let action = if updated.is_active { "activated" } else { "deactivated" };
            println!("Successfully {} user '{}'", action, updated.username);
            println!("Active status: {}", updated.is_active);
        }
    }

    Ok(())
}
