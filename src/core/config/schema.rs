//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing; relative cores roots are
//! resolved against the directory of the config file by the loader.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Configuration file contents.
///
/// # Example
///
/// ```toml
/// cores_root = ["~/cores", "vendor/cores"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Directories searched for descriptor files
    pub cores_root: Vec<PathBuf>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cores_root.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "cores_root entries cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cores_root() {
        let config: FileConfig = toml::from_str("cores_root = [\"a\", \"/b\"]\n").unwrap();
        assert_eq!(
            config.cores_root,
            vec![PathBuf::from("a"), PathBuf::from("/b")]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("library_root = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_entry_invalid() {
        let config: FileConfig = toml::from_str("cores_root = [\"\"]\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
