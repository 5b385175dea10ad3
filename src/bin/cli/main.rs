mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "devtrack-admin", about = "devtrack account administration", version)]
struct Cli {
    /// TOML config file (overrides DEVTRACK_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List every account with its status
    ListUsers,

    /// Flip an account between active and inactive
    ToggleActive {
        /// Username of the account
        username: String,
    },

    /// Activate the oldest account and grant it admin rights
    MakeFirstAdmin,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::ListUsers => commands::list_users::run(&app, &cli.format).await?,
        Command::ToggleActive { username } => {
            commands::toggle_active::run(&app, &username, &cli.format).await?
        }
        Command::MakeFirstAdmin => commands::make_first_admin::run(&app, &cli.format).await?,
    }

    Ok(())
}
