//! Configuration module for the file-transfer server.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values. The listen
//! address and worker count default per runtime strategy: prefork keeps
//! a small pool of processes, the thread pool a much larger one.

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Worker-pool strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum RuntimeType {
    /// Forked worker processes sharing the listening socket
    Prefork,
    /// A single accept loop feeding a fixed set of worker threads
    ThreadPool,
}

impl RuntimeType {
    fn default_listen(self) -> String {
        match self {
            RuntimeType::Prefork => "0.0.0.0:6663".to_string(),
            RuntimeType::ThreadPool => "0.0.0.0:6664".to_string(),
        }
    }

    fn default_workers(self) -> usize {
        match self {
            RuntimeType::Prefork => 4,
            RuntimeType::ThreadPool => 50,
        }
    }
}

/// Command-line arguments for the file server
#[derive(Parser, Debug)]
#[command(name = "filedepot")]
#[command(version = "0.1.0")]
#[command(about = "A chunked file-transfer server", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Worker-pool strategy (prefork or threadpool)
    #[arg(short, long, value_enum)]
    pub runtime: Option<RuntimeType>,

    /// Address to bind to (e.g., 0.0.0.0:6663)
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Number of worker processes or threads
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Directory where transferred files are stored
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Accept queue depth for the listening socket
    #[arg(long)]
    pub backlog: Option<i32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Worker-pool strategy
    pub runtime: Option<RuntimeType>,
    /// Address to bind to
    pub listen: Option<String>,
    /// Number of worker processes or threads
    pub workers: Option<usize>,
    /// Accept queue depth
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            listen: None,
            workers: None,
            backlog: default_backlog(),
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory where transferred files are stored
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_backlog() -> i32 {
    10
}

fn default_root() -> PathBuf {
    PathBuf::from("files")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub runtime: RuntimeType,
    pub listen: String,
    pub workers: usize,
    pub backlog: i32,
    pub root: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(CliArgs::parse())
    }

    fn resolve(cli: CliArgs) -> Result<Self, ConfigError> {
        // Load TOML config if specified
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        // Merge CLI args with TOML config (CLI takes precedence); listen
        // address and pool size fall back to the strategy's defaults.
        let runtime = cli
            .runtime
            .or(toml_config.server.runtime)
            .unwrap_or(RuntimeType::Prefork);

        let workers = cli
            .workers
            .or(toml_config.server.workers)
            .unwrap_or_else(|| runtime.default_workers());
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        Ok(Config {
            runtime,
            listen: cli
                .listen
                .or(toml_config.server.listen)
                .unwrap_or_else(|| runtime.default_listen()),
            workers,
            backlog: cli.backlog.unwrap_or(toml_config.server.backlog),
            root: cli.root.unwrap_or(toml_config.storage.root),
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        })
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
    ZeroWorkers,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ZeroWorkers => write!(f, "Worker count must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
