//! cmdchain configuration
//!
//! TOML-backed engine limits with environment overrides.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high -> low):
//! 1. Environment variables (CMDCHAIN_*)
//! 2. Config file (cmdchain.toml)
//! 3. Default values
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cmdchain::util::config;
//!
//! let limits = config::load_or_default(Path::new("cmdchain.toml")).unwrap();
//! let ctx: cmdchain::ExecutionContext<String> =
//!     cmdchain::ExecutionContext::with_config(limits);
//! # let _ = ctx;
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::exec::EngineConfig;

/// Environment variable overriding `max_depth`.
pub const ENV_MAX_DEPTH: &str = "CMDCHAIN_MAX_DEPTH";
/// Environment variable overriding `queue_capacity`.
pub const ENV_QUEUE_CAPACITY: &str = "CMDCHAIN_QUEUE_CAPACITY";
/// Environment variable overriding `tick_budget`.
pub const ENV_TICK_BUDGET: &str = "CMDCHAIN_TICK_BUDGET";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        /// Offending environment variable.
        var: &'static str,
        /// Value it held.
        value: String,
    },
}

/// Load engine limits from a TOML file.
///
/// Fields absent from the file keep their defaults.
pub fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Load engine limits from `path` if it exists, falling back to defaults,
/// then apply `CMDCHAIN_*` environment overrides on top.
pub fn load_or_default(path: &Path) -> Result<EngineConfig, ConfigError> {
    let mut config = if path.exists() {
        load(path)?
    } else {
        EngineConfig::default()
    };
    apply_env(&mut config)?;
    Ok(config)
}

/// Write engine limits to a TOML file, creating parent directories as
/// needed.
pub fn save(path: &Path, config: &EngineConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Apply `CMDCHAIN_*` environment overrides to `config`.
pub fn apply_env(config: &mut EngineConfig) -> Result<(), ConfigError> {
    if let Some(max_depth) = read_env::<u32>(ENV_MAX_DEPTH)? {
        debug!("{} overrides max_depth: {}", ENV_MAX_DEPTH, max_depth);
        config.max_depth = max_depth;
    }
    if let Some(queue_capacity) = read_env::<usize>(ENV_QUEUE_CAPACITY)? {
        debug!(
            "{} overrides queue_capacity: {}",
            ENV_QUEUE_CAPACITY, queue_capacity
        );
        config.queue_capacity = queue_capacity;
    }
    if let Some(tick_budget) = read_env::<u32>(ENV_TICK_BUDGET)? {
        debug!("{} overrides tick_budget: {}", ENV_TICK_BUDGET, tick_budget);
        config.tick_budget = tick_budget;
    }
    Ok(())
}

/// Read and parse one environment variable, absent counting as `None`.
fn read_env<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(ConfigError::InvalidEnv { var, value: raw }),
        },
        Err(_) => Ok(None),
    }
}
