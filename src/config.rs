//! Runner configuration
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - `commandeer.toml` in the working directory, or the file named by
//!   `COMMANDEER_CONFIG`
//! - `COMMANDEER_*` environment variables (`__` nests, lists are comma
//!   separated: `COMMANDEER_NAMESPACES=app::commands,tools`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::{DiscoveryOptions, DEFAULT_EXTENSION, DEFAULT_SUFFIX};
use crate::error::Result;
use crate::loader::PathMap;

/// Default configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "commandeer.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "COMMANDEER_CONFIG";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "COMMANDEER";

/// Namespace of the built-in commands
pub const DEFAULT_NAMESPACE: &str = "commandeer::commands";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Namespace roots registered at startup
    pub namespaces: Vec<String>,
    /// Namespace → source directories. Empty means "use the compiled-in catalog".
    pub paths: HashMap<String, Vec<PathBuf>>,
    pub command_suffix: String,
    pub source_extension: Option<String>,
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            namespaces: vec![DEFAULT_NAMESPACE.to_string()],
            paths: HashMap::new(),
            command_suffix: DEFAULT_SUFFIX.to_string(),
            source_extension: Some(DEFAULT_EXTENSION.to_string()),
            log_level: "warn".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load a single TOML file, with no environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("config: loading {}", path.display());
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Layered lookup: defaults, config file, environment
    pub fn load() -> Result<Self> {
        let (path, required) = match std::env::var_os(CONFIG_ENV) {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        Self::layered(&path, required, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("namespaces")
            .try_parsing(true)
    }

    fn layered(path: &Path, required: bool, environment: Environment) -> Result<Self> {
        debug!("config: file {} (required: {})", path.display(), required);
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(environment)
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Discovery naming convention from `command_suffix` / `source_extension`
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            command_suffix: self.command_suffix.clone(),
            extension: self.source_extension.clone().filter(|ext| !ext.is_empty()),
        }
    }

    /// Filesystem loader for the configured paths, if any
    pub fn path_map(&self) -> Option<PathMap> {
        if self.paths.is_empty() {
            return None;
        }
        Some(self.paths.iter().map(|(ns, dirs)| (ns.as_str(), dirs.clone())).collect())
    }
}
