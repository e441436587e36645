//! Configuration file and environment helpers

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading configuration resources
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid TOML for the target type
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable holds a value that cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },
}

/// Parse a TOML document into `T`
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a TOML file into `T`
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded configuration file");
    parse_toml(&content)
}

/// Read an environment variable and parse it.
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn env_override<T: FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: var.to_string(),
                value,
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        #[serde(default)]
        items: Vec<u32>,
    }

    #[test]
    fn test_parse_toml() {
        let sample: Sample = parse_toml("name = \"bmv\"\nitems = [1, 2]").unwrap();
        assert_eq!(sample.name, "bmv");
        assert_eq!(sample.items, vec![1, 2]);
    }

    #[test]
    fn test_parse_toml_error() {
        let err = parse_toml::<Sample>("name = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_toml::<Sample>("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_env_override_unset() {
        let value: Option<u64> = env_override("BMV_UTILS_TEST_UNSET_VARIABLE").unwrap();
        assert!(value.is_none());
    }
}
