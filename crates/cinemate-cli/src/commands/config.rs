use super::progress::is_interactive;
use super::prompts::{prompt_string, prompt_yes_no};
use crate::output::Output;
use crate::ConfigCommands;
use cinemate_config::{Config, PathManager, API_URL_ENV};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::json;
use std::path::Path;

pub async fn run_config(cmd: ConfigCommands, config: &Config, config_file: &Path, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config, config_file, output),
        ConfigCommands::Init {
            base_url,
            force,
            log_to_file,
        } => init_config(base_url, force, log_to_file, is_interactive(), config_file, output),
    }
}

fn section(title: &str) -> Cell {
    Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn show_config(config: &Config, config_file: &Path, output: &Output) -> Result<()> {
    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "exists": config_file.exists(),
            "api": {
                "base_url": config.api.base_url,
                "timeout_secs": config.api.timeout_secs,
                "user_agent": config.api.user_agent,
            },
            "view": {
                "detail_concurrency": config.view.detail_concurrency,
            },
            "logging": {
                "level": config.logging.level,
                "json": config.logging.json,
                "file": config.logging.file.as_ref().map(|p| p.display().to_string()),
            },
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!(
            "No configuration file at {}; showing defaults. Run 'cinemate config init' to create one.",
            config_file.display()
        ));
    }

    let mut table = Table::new();
    table.set_header(vec![section("Setting"), section("Value")]);
    table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("api.base_url"), Cell::new(&config.api.base_url)]);
    table.add_row(vec![Cell::new("api.timeout_secs"), Cell::new(config.api.timeout_secs)]);
    table.add_row(vec![Cell::new("api.user_agent"), Cell::new(&config.api.user_agent)]);
    table.add_row(vec![
        Cell::new("view.detail_concurrency"),
        Cell::new(config.view.detail_concurrency),
    ]);
    table.add_row(vec![Cell::new("logging.level"), Cell::new(&config.logging.level)]);
    table.add_row(vec![
        Cell::new("logging.json"),
        Cell::new(config.logging.json.map_or_else(|| "auto".to_string(), |j| j.to_string())),
    ]);
    table.add_row(vec![
        Cell::new("logging.file"),
        Cell::new(
            config
                .logging
                .file
                .as_ref()
                .map_or_else(|| "stderr".to_string(), |p| p.display().to_string()),
        ),
    ]);
    output.table(table);

    if std::env::var(API_URL_ENV).is_ok() {
        output.info(format!("{} is set and overrides api.base_url", API_URL_ENV));
    }
    Ok(())
}

fn init_config(
    base_url: Option<String>,
    force: bool,
    log_to_file: bool,
    interactive: bool,
    config_file: &Path,
    output: &Output,
) -> Result<()> {
    if config_file.exists() && !force {
        let overwrite = interactive
            && prompt_yes_no(
                &format!("{} already exists. Overwrite it?", config_file.display()),
                Some(false),
            )?;
        if !overwrite {
            output.warn(format!(
                "Configuration already exists at {} (use --force to overwrite)",
                config_file.display()
            ));
            return Ok(());
        }
    }

    let mut config = Config::default();
    config.api.base_url = match base_url {
        Some(url) => url,
        None if interactive => {
            let url = prompt_string("Catalog backend URL", Some(&config.api.base_url))?;
            if url.trim().is_empty() {
                config.api.base_url.clone()
            } else {
                url.trim().to_string()
            }
        }
        None => config.api.base_url.clone(),
    };
    config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;

    let log_to_file = log_to_file || (interactive && prompt_yes_no("Write logs to a file?", Some(false))?);
    if let Some(parent) = config_file.parent() {
        let paths = PathManager::with_base(parent);
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create {}: {}", parent.display(), e))?;
        if log_to_file {
            config.logging.file = Some(paths.default_log_file());
        }
    }
    config
        .save_to_file(config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}
