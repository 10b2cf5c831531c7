//! Config command implementation.
//!
//! View and create configuration settings.
//! Config file is located at ~/.config/raf/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Result limit applied when neither `--limit` nor `filter.limit` is set.
pub const DEFAULT_LIMIT: usize = 50;

/// Table columns shown when `output.columns` is not set.
pub const DEFAULT_COLUMNS: [&str; 4] = ["title", "date", "venue", "interestedCount"];

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# raf - listing filter configuration

# Config schema version (do not modify)
version = 1

# Output preferences
[output]
# color = true                                          # NO_COLOR and --no-color still win
# columns = ["title", "date", "venue", "interestedCount"] # table columns, any record field

# Filter defaults
[filter]
# sort = "listingDate"   # listingDate, score, title, or any field name
# limit = 50             # max records shown without --all
# items_key = "events"   # key of the record array in object inputs
"#;

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Filter defaults.
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl Config {
    /// Table columns, falling back to the defaults.
    pub fn columns(&self) -> Vec<String> {
        match &self.output.columns {
            Some(columns) => columns.clone(),
            None => DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Record fields shown as table columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

/// Filter defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Sort key used when `--sort` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Result limit used when `--limit` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Record array key used when `--items-key` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_key: Option<String>,
}

/// Gets the config file path.
///
/// `RAF_CONFIG` wins, then `$XDG_CONFIG_HOME/raf/config.toml`, then
/// `~/.config/raf/config.toml` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("RAF_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return Ok(PathBuf::from(xdg_config).join("raf").join("config.toml"));
        }
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("raf").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk.
///
/// A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {e}")))?;

    let config = parse_config(&content)?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Parses and validates config file contents.
fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {e}")))?;

    if config.output.columns.as_ref().is_some_and(|c| c.is_empty()) {
        return Err(CommandError::Config(
            "output.columns must name at least one field".to_string(),
        ));
    }
    if config.filter.limit == Some(0) {
        return Err(CommandError::Config(
            "filter.limit must be at least 1".to_string(),
        ));
    }

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {CONFIG_VERSION}",
            config.version
        )));
    }

    // Version 1 is the initial schema; later migrations go here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext, config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{header}\n");
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[output]");
        if let Some(color) = config.output.color {
            println!("  color: {color}");
        }
        println!("  columns: {}", config.columns().join(", "));

        println!("\n[filter]");
        if let Some(ref sort) = config.filter.sort {
            println!("  sort: {sort}");
        }
        println!(
            "  limit: {}",
            config.filter.limit.unwrap_or(DEFAULT_LIMIT)
        );
        if let Some(ref key) = config.filter.items_key {
            println!("  items_key: {key}");
        }

        if !path.exists() {
            println!("\n(No config file exists. Run 'raf config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {e}"))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {e}")))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created config at {}", path.display());
    }

    Ok(())
}
