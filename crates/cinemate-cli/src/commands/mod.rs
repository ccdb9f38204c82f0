pub mod catalog;
pub mod config;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod watchlist;

use cinemate_client::ApiClient;
use cinemate_config::{Config, PathManager};
use cinemate_core::WatchlistSync;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Load the config file (or defaults), then layer env and flag overrides on top
pub fn load_config(api_url: Option<String>) -> Result<(Config, PathBuf)> {
    let config_file = PathManager::default().config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    config.apply_env_overrides();
    if let Some(url) = api_url {
        config.api.base_url = url;
    }

    Ok((config, config_file))
}

/// Everything a command needs to talk to the backend
pub struct Session {
    pub config: Config,
    pub client: Arc<ApiClient>,
    pub sync: WatchlistSync<ApiClient>,
}

impl Session {
    pub fn connect(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration: {}", e))?;
        let client = Arc::new(ApiClient::new(config.api.clone()).wrap_err("Failed to create API client")?);
        let sync = WatchlistSync::new(client.clone());
        Ok(Self { config, client, sync })
    }
}
