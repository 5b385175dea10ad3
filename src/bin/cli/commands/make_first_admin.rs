use anyhow::{Context, Result};

use devtrack_lib::accounts::AccountView;

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let first = app
        .accounts
        .all()
        .await?
        .into_iter()
        .next()
        .context("No users found in the database")?;

    let already_admin = first.is_active && first.is_superuser;
    app.accounts.set_active(first.id, true).await?;
    let updated = app.accounts.set_superuser(first.id, true).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&AccountView::from(updated))?);
        }
        OutputFormat::Plain if already_admin => {
            println!("User '{}' is already an admin.", updated.username);
        }
        OutputFormat::Plain => {
            println!("Made user '{}' an admin", updated.username);
            println!("Email: {}", updated.email);
            println!("This user can now approve other accounts.");
        }
    }

    Ok(())
}
