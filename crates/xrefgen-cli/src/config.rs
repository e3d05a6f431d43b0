use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use xrefgen_generate::GenerateOptions;

use crate::driver::DriverConfig;

/// Dataset location relative to the user's home directory.
const DEFAULT_SOURCE_SUFFIX: [&str; 3] = ["Downloads", "bible_databases", "sources"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Optional settings file (`--config`). Every field falls back to a default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverSettings {
    pub source_directory: Option<PathBuf>,
    pub format_directory: Option<PathBuf>,
    pub strict: Option<bool>,
    pub batch_size: Option<usize>,
}

/// Values given on the command line; these win over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_directory: Option<PathBuf>,
    pub format_directory: Option<PathBuf>,
    pub strict: bool,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub driver: DriverConfig,
    pub options: GenerateOptions,
}

pub fn load_settings(path: &Path) -> Result<DriverSettings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: DriverSettings = toml::from_str(&content)?;
    Ok(settings)
}

/// The invoking user's home directory, if the environment names one.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn default_source_directory(home: &Path) -> PathBuf {
    DEFAULT_SOURCE_SUFFIX
        .iter()
        .fold(home.to_path_buf(), |path, part| path.join(part))
}

/// `output/` beside the driver crate itself.
pub fn default_format_directory() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("output")
}

/// Expands a leading `~` component to `home`.
pub fn expand_home(path: &Path, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = home.ok_or_else(|| {
        ConfigError::Invalid(format!(
            "cannot expand {}: home directory is unknown",
            path.display()
        ))
    })?;
    Ok(home.join(rest))
}

/// Merges flags, settings and defaults, in that order of precedence.
pub fn resolve(
    overrides: Overrides,
    settings: &DriverSettings,
    home: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let source_directory = match overrides
        .source_directory
        .or_else(|| settings.source_directory.clone())
    {
        Some(path) => expand_home(&path, home)?,
        None => {
            let home = home.ok_or_else(|| {
                ConfigError::Invalid(
                    "home directory is unknown; pass --source or set source_directory".to_string(),
                )
            })?;
            default_source_directory(home)
        }
    };

    let format_directory = match overrides
        .format_directory
        .or_else(|| settings.format_directory.clone())
    {
        Some(path) => expand_home(&path, home)?,
        None => default_format_directory(),
    };

    let defaults = GenerateOptions::default();
    let batch_size = overrides
        .batch_size
        .or(settings.batch_size)
        .unwrap_or(defaults.batch_size);
    if batch_size == 0 {
        return Err(ConfigError::Invalid(
            "batch_size must be at least 1".to_string(),
        ));
    }

    let options = GenerateOptions {
        strict: overrides.strict || settings.strict.unwrap_or(defaults.strict),
        batch_size,
    };

    Ok(ResolvedConfig {
        driver: DriverConfig {
            source_directory,
            format_directory,
        },
        options,
    })
}
