//! Configuration management for the PRP command tool.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.prp/config.yaml)
//!
//! Later sources win: defaults, environment, config file, environment
//! overrides, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::context::InvocationContext;
use crate::error::{AppError, AppResult};

/// Agent executable launched by dispatch when nothing else is configured.
pub const DEFAULT_AGENT_CLI: &str = "codex";

/// Approval-mode flag passed ahead of the prompt on dispatch.
pub const DEFAULT_APPROVAL_FLAG: &str = "--full-auto";

/// Driver used by `prp run` when nothing else is configured.
pub const DEFAULT_DRIVER: &str = "codex";

/// Log filter used when neither flags, environment nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const KNOWN_DRIVERS: [&str; 3] = ["codex", "claude", "noop"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Project directory; the project search root lives beneath it
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Home directory; the user search root lives beneath it
    pub home: Option<PathBuf>,

    /// External agent settings
    pub agent: AgentConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// External agent settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Executable name or path
    pub cli: String,

    /// Flag placed before the prompt on dispatch
    #[serde(rename = "approvalFlag")]
    pub approval_flag: String,

    /// Default driver for `prp run`
    pub driver: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cli: DEFAULT_AGENT_CLI.to_string(),
            approval_flag: DEFAULT_APPROVAL_FLAG.to_string(),
            driver: DEFAULT_DRIVER.to_string(),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub agent_cli: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    agent: Option<AgentSection>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AgentSection {
    cli: Option<String>,
    #[serde(rename = "approvalFlag")]
    approval_flag: Option<String>,
    driver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            home: dirs::home_dir(),
            agent: AgentConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, environment, config file and flags.
    ///
    /// Environment variables:
    /// - `PRP_WORKSPACE`: Override workspace path
    /// - `PRP_CONFIG`: Path to config file
    /// - `PRP_AGENT_CLI`: Agent executable
    /// - `PRP_DRIVER`: Default driver for `prp run`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use prp_core::config::{AppConfig, ConfigOverrides};
    ///
    /// let config = AppConfig::load(ConfigOverrides::default()).expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load(overrides: ConfigOverrides) -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("PRP_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("PRP_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // The file location depends on the final workspace, so apply these early
        if let Some(ref workspace) = overrides.workspace {
            config.workspace = workspace.clone();
        }
        if let Some(ref config_file) = overrides.config_file {
            config.config_file = Some(config_file.clone());
        }

        if !config.workspace.is_dir() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config.config_path();
        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(cli) = std::env::var("PRP_AGENT_CLI") {
            config.agent.cli = cli;
        }

        if let Ok(driver) = std::env::var("PRP_DRIVER") {
            config.agent.driver = driver;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        let config = config.with_overrides(overrides);
        config.validate()?;

        tracing::debug!("Configuration loaded from {:?}", config_path);
        Ok(config)
    }

    /// Path of the YAML file consulted by `load`.
    pub fn config_path(&self) -> PathBuf {
        match self.config_file {
            Some(ref cf) if cf.is_absolute() => cf.clone(),
            Some(ref cf) => self.workspace.join(cf),
            None => self.config_dir().join("config.yaml"),
        }
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        // An empty file deserializes to unit, not a struct
        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(contents)?
        };

        let mut result = self.clone();

        if let Some(agent) = config_file.agent {
            if let Some(cli) = agent.cli {
                result.agent.cli = cli;
            }
            if let Some(flag) = agent.approval_flag {
                result.agent.approval_flag = flag;
            }
            if let Some(driver) = agent.driver {
                result.agent.driver = driver;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over everything else.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(workspace) = overrides.workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = overrides.config_file {
            self.config_file = Some(config_file);
        }

        if let Some(cli) = overrides.agent_cli {
            self.agent.cli = cli;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .prp directory.
    pub fn config_dir(&self) -> PathBuf {
        self.workspace.join(".prp")
    }

    /// Effective log filter.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Build the per-run context from the configured directories.
    ///
    /// The working directory is the process's, not the workspace: the two
    /// differ when `--workspace` points elsewhere.
    pub fn invocation_context(&self) -> AppResult<InvocationContext> {
        let cwd = std::env::current_dir()?;
        Ok(InvocationContext::from_dirs(
            cwd,
            &self.workspace,
            self.home.as_deref(),
        ))
    }

    /// Validate agent settings.
    pub fn validate(&self) -> AppResult<()> {
        if self.agent.cli.trim().is_empty() {
            return Err(AppError::Config(
                "Agent executable cannot be empty".to_string(),
            ));
        }

        let driver = self.agent.driver.to_lowercase();
        if !KNOWN_DRIVERS.contains(&driver.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown driver: {}. Supported: {}",
                self.agent.driver,
                KNOWN_DRIVERS.join(", ")
            )));
        }

        Ok(())
    }
}
