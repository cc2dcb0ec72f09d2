//! # cmdkit Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Loading, merging and validation of the CLI configuration. The library
//! itself takes everything as explicit arguments; this layer only supplies
//! defaults for `cmdkit run` and `cmdkit pid`.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.cmdkit.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `<config_dir>/cmdkit/config.toml`
//! 3. Default values defined in the code
//!
//! Paths may use `~`, which is expanded after merging.
//!
//! ```toml
//! [process]
//! working_dir = "~/work"
//! capture_window_ms = 1000
//!
//! [process.env]
//! RUST_LOG = "debug"
//!
//! [pid]
//! file = "~/.cache/cmdkit.pid"
//! ```
//!
//! ## Examples
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let window = cfg.process.capture_window();
//! let pid_file = cfg.pid.file.as_deref();
//! ```
//!
use crate::core::error::{CliError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".cmdkit.toml";
const DEFAULT_CAPTURE_WINDOW_MS: u64 = 1000;

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub process: ProcessConfig,
    #[serde(default)]
    pub pid: PidConfig,
}

/// Defaults for processes started by `cmdkit run`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    /// Working directory for spawned commands (can use ~). Will be expanded.
    pub working_dir: Option<String>,
    /// Default capture window for `cmdkit run --timed`.
    #[serde(default = "default_capture_window_ms")]
    pub capture_window_ms: u64,
    /// Extra environment variables for spawned commands.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            working_dir: None,
            capture_window_ms: default_capture_window_ms(),
            env: BTreeMap::new(),
        }
    }
}

impl ProcessConfig {
    pub fn capture_window(&self) -> Duration {
        Duration::from_millis(self.capture_window_ms)
    }
}

/// PID-file settings for `cmdkit pid`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PidConfig {
    /// Default PID file (can use ~). Will be expanded.
    pub file: Option<String>,
}

fn default_capture_window_ms() -> u64 {
    DEFAULT_CAPTURE_WINDOW_MS
}

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("com", "CmdKit", "cmdkit") else {
        warn!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.exists() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.cmdkit.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win over user values; environment maps are combined key by key.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project_cfg) = project else {
        return user;
    };
    let mut env = user.process.env;
    env.extend(project_cfg.process.env);
    Config {
        process: ProcessConfig {
            working_dir: project_cfg.process.working_dir.or(user.process.working_dir),
            capture_window_ms: if project_cfg.process.capture_window_ms
                != default_capture_window_ms()
            {
                project_cfg.process.capture_window_ms
            } else {
                user.process.capture_window_ms
            },
            env,
        },
        pid: PidConfig {
            file: project_cfg.pid.file.or(user.pid.file),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    debug!("Expanding paths in configuration...");
    if let Some(dir) = config.process.working_dir.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded working directory: {}", dir);
    }
    if let Some(file) = config.pid.file.as_mut() {
        *file = shellexpand::tilde(file).into_owned();
        debug!("Expanded PID file path: {}", file);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.process.capture_window_ms == 0 {
        return Err(anyhow!(CliError::Config(
            "process.capture_window_ms must be greater than 0".to_string()
        )));
    }
    if let Some(dir) = &config.process.working_dir {
        let dir = PathBuf::from(dir);
        if !dir.exists() {
            warn!(
                "Configured working directory '{}' does not exist.",
                dir.display()
            );
        } else if !dir.is_dir() {
            return Err(anyhow!(CliError::Config(format!(
                "Configured working directory '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    if let Some(file) = &config.pid.file {
        if file.trim().is_empty() {
            return Err(anyhow!(CliError::Config(
                "pid.file cannot be empty; remove the key instead".to_string()
            )));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}
