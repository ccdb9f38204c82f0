pub mod config;
pub mod paths;

pub use config::{ApiConfig, Config, LoggingConfig, ViewConfig, API_URL_ENV};
pub use paths::{container_base_path, PathManager};
