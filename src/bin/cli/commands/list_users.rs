use anyhow::Result;

use devtrack_lib::accounts::AccountView;

use crate::app::App;
use crate::OutputFormat;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub async fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let accounts = app.accounts.all().await?;

    match format {
        OutputFormat::Json => {
            let views: Vec<AccountView> = accounts.into_iter().map(AccountView::from).collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        OutputFormat::Plain => {
            if accounts.is_empty() {
                println!("No users found in {}.", app.settings.database_dir().display());
                return Ok(());
            }

            println!("Total users: {}\n", accounts.len());
            println!(
                "{:<20} {:<30} {:<8} {:<8} Created",
                "Username", "Email", "Active", "Admin"
            );
            println!("{}", "-".repeat(85));
            for account in &accounts {
                println!(
                    "{:<20} {:<30} {:<8} {:<8} {}",
                    account.username,
                    account.email,
                    yes_no(account.is_active),
                    yes_no(account.is_superuser),
                    account.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}
