use std::path::{Path, PathBuf};

use tracing::debug;

use crate::args::DEFAULT_CONFIG_FILES;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some(ext) => Err(ConfigError::UnsupportedExtension {
                ext: ext.to_owned(),
            }),
            None => Err(ConfigError::MissingExtension),
        }
    }

    fn parse(self, path: &Path, content: &str) -> Result<ConfigFile, ConfigError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            }),
            Self::Json => serde_json::from_str(content).map_err(|source| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Loads `--config` when given, otherwise the first default file found in
/// the working directory. No file at all is not an error.
///
/// # Errors
///
/// Returns an error when the chosen file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None => match find_default_config(Path::new(".")) {
            Some(path) => path,
            None => return Ok(None),
        },
    };
    debug!("Using config file {}", path.display());
    load_config_file(&path).map(Some)
}

/// `latprobe.toml` wins over `latprobe.json` when both exist.
pub(crate) fn find_default_config(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let format = ConfigFormat::from_path(path).map_err(AppError::config)?;
    let content = std::fs::read_to_string(path).map_err(|source| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })
    })?;
    format.parse(path, &content).map_err(AppError::config)
}
