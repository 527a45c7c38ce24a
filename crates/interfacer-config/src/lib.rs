//! `interfacer.toml` loading and discovery, plus `tracing` initialisation.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::{init_tracing, LoggingConfig};

/// Environment variable naming an explicit config file (absolute, or relative to the
/// workspace root).
pub const INTERFACER_CONFIG_ENV_VAR: &str = "INTERFACER_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfacerConfig {
    #[serde(default)]
    pub interfaces: InterfacesConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub classpath: ClasspathConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfacesConfig {
    /// Package prefixes selecting classpath interfaces. Entries may themselves be
    /// comma-separated lists.
    #[serde(default)]
    pub packages: Vec<String>,
    /// Directory of interface source files.
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
}

impl InterfacesConfig {
    /// `packages` split on commas, trimmed, without empty entries.
    pub fn package_filter(&self) -> Vec<String> {
        split_packages(&self.packages)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Root of the classes to retrofit.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClasspathConfig {
    /// Class directories and jars, in lookup order.
    #[serde(default)]
    pub entries: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub max_passes: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_string())
    }
}

/// Splits comma-separated package lists.
pub fn split_packages(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|pkg| !pkg.is_empty())
        .map(str::to_string)
        .collect()
}

impl InterfacerConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: InterfacerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file; relative paths inside it are resolved against its directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::load_from_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_passes == Some(0) {
            return Err(ConfigError::Invalid(
                "engine.max_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Makes every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(dir) = self.interfaces.source_dir.as_mut() {
            resolve(dir);
        }
        if let Some(dir) = self.scan.dir.as_mut() {
            resolve(dir);
        }
        self.classpath.entries.iter_mut().for_each(resolve);
        if let Some(file) = self.logging.file.as_mut() {
            resolve(file);
        }
    }
}

/// Finds the config file for `workspace_root`:
///
/// 1) `INTERFACER_CONFIG_PATH` (absolute or relative to `workspace_root`)
/// 2) `interfacer.toml` in `workspace_root`
/// 3) `.interfacer.toml` in `workspace_root`
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(INTERFACER_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            workspace_root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["interfacer.toml", ".interfacer.toml"]
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Loads the configuration for a workspace root, or the default when there is none.
pub fn load_for_workspace(
    workspace_root: &Path,
) -> Result<(InterfacerConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        return Ok((InterfacerConfig::default(), None));
    };
    let config = InterfacerConfig::load_from_path(&path)?;
    tracing::debug!(target: "interfacer.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}
