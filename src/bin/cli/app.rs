use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use devtrack_lib::accounts::AccountStorage;
use devtrack_lib::config::Settings;
use devtrack_lib::store::JsonFileStore;

/// Shared application state for CLI commands
pub struct App {
    pub settings: Settings,
    pub accounts: AccountStorage,
}

impl App {
    /// Open the configured database
    pub fn new(config: Option<&Path>) -> Result<Self> {
        let settings = Settings::load(config).context("Failed to load configuration")?;
        let database_dir = settings.database_dir();
        let store = JsonFileStore::open(&database_dir)
            .with_context(|| format!("Failed to open database at {}", database_dir.display()))?;

        Ok(Self {
            settings,
            accounts: AccountStorage::new(Arc::new(store)),
        })
    }
}
