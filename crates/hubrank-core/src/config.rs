use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::hits::{DEFAULT_DEGENERACY_THRESHOLD, DEFAULT_ITERATIONS, HitsConfig, UpdateRule};

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "hubrank.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HubrankConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_degeneracy_threshold")]
    pub degeneracy_threshold: f64,
    #[serde(default)]
    pub update: UpdateRule,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            degeneracy_threshold: default_degeneracy_threshold(),
            update: UpdateRule::default(),
        }
    }
}

impl ScoringConfig {
    /// Convert to the parameters [`crate::hits::hits`] takes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured threshold is negative or not finite.
    pub fn to_hits_config(&self) -> Result<HitsConfig> {
        let config = HitsConfig {
            iterations: self.iterations,
            degeneracy_threshold: self.degeneracy_threshold,
            update: self.update,
        };
        config
            .validate()
            .context("invalid [scoring] configuration")?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text` or `json`. Unset falls back to TTY detection.
    #[serde(default)]
    pub format: Option<String>,
}

/// Why a config file could not be loaded.
///
/// Returned inside [`anyhow::Error`] by the loaders here; callers that need
/// the [`ErrorCode`] can `downcast_ref::<ConfigError>()`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file named explicitly does not exist.
    #[error("config file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::ConfigNotFound,
            Self::Read { .. } => ErrorCode::ConfigReadError,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

/// Partial config as read from one file; unset keys defer to lower layers.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    scoring: ScoringLayer,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringLayer {
    iterations: Option<usize>,
    degeneracy_threshold: Option<f64>,
    update: Option<UpdateRule>,
}

impl HubrankConfig {
    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(iterations) = layer.scoring.iterations {
            self.scoring.iterations = iterations;
        }
        if let Some(threshold) = layer.scoring.degeneracy_threshold {
            self.scoring.degeneracy_threshold = threshold;
        }
        if let Some(update) = layer.scoring.update {
            self.scoring.update = update;
        }
        if layer.output.format.is_some() {
            self.output.format = layer.output.format;
        }
    }
}

fn load_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let layer = toml::from_str::<ConfigLayer>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(layer))
}

/// Parse a single config file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<HubrankConfig> {
    let mut config = HubrankConfig::default();
    if let Some(layer) = load_layer(path)? {
        config.apply(layer);
    }
    Ok(config)
}

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hubrank/config.toml"))
}

/// Merge defaults, then `user`, then `project`. Missing files are skipped.
///
/// # Errors
///
/// Returns an error if any present file cannot be read or parsed.
pub fn resolve_config(user: Option<&Path>, project: Option<&Path>) -> Result<HubrankConfig> {
    let mut config = HubrankConfig::default();
    for path in [user, project].into_iter().flatten() {
        if let Some(layer) = load_layer(path)? {
            config.apply(layer);
        }
    }
    Ok(config)
}

/// Resolve config for a working directory: the user file plus either
/// `explicit` or `<project_root>/hubrank.toml`.
///
/// # Errors
///
/// Returns an error if a present file cannot be read or parsed, or if
/// `explicit` names a file that does not exist.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<HubrankConfig> {
    let project = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            path.to_path_buf()
        }
        None => project_root.join(PROJECT_CONFIG_FILE),
    };
    let user = user_config_path();
    resolve_config(user.as_deref(), Some(&project))
}

const fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

const fn default_degeneracy_threshold() -> f64 {
    DEFAULT_DEGENERACY_THRESHOLD
}
