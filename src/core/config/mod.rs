//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. The `--config` path (must exist)
//! 2. `$COREPUB_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/corepub/config.toml`
//! 4. `~/.config/corepub/config.toml`
//!
//! # Precedence
//!
//! Cores roots from the config file come first, followed by the roots given
//! on the command line. Later roots override earlier ones when two
//! descriptors declare the same core.
//!
//! # Example
//!
//! ```no_run
//! use corepub::core::config::Config;
//! use std::path::PathBuf;
//!
//! let config = Config::load(None).unwrap();
//! let roots = config.cores_roots(&[PathBuf::from("extra/cores")]);
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults if no file was found)
    pub file: FileConfig,
    /// Path of the loaded config file, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read, parsed, or
    /// validated.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::search_paths().into_iter().find(|p| p.exists()),
        };

        match path {
            Some(path) => {
                let file = Self::read_config(&path)?;
                Ok(Config {
                    file,
                    path: Some(path),
                })
            }
            None => Ok(Config::default()),
        }
    }

    /// Standard config locations, in search order.
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("COREPUB_CONFIG") {
            paths.push(PathBuf::from(path));
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_home).join("corepub/config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config/corepub/config.toml"));
        }

        paths
    }

    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the loaded config file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All cores roots: config entries, then `extra`.
    ///
    /// `~/` is expanded; other relative config entries are resolved against
    /// the config file's directory. `extra` entries are used as given.
    pub fn cores_roots(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        let base = self.path.as_deref().and_then(Path::parent);
        self.file
            .cores_root
            .iter()
            .map(|root| resolve_root(root, base))
            .chain(extra.iter().cloned())
            .collect()
    }
}

fn resolve_root(root: &Path, base: Option<&Path>) -> PathBuf {
    if let Ok(rest) = root.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    match base {
        Some(base) if root.is_relative() => base.join(root),
        _ => root.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corepub.toml");
        fs::write(&path, "cores_root = [\"cores\", \"/abs/cores\"]\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.path(), Some(path.as_path()));
        assert_eq!(
            config.cores_roots(&[PathBuf::from("cli/cores")]),
            vec![
                dir.path().join("cores"),
                PathBuf::from("/abs/cores"),
                PathBuf::from("cli/cores"),
            ]
        );
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corepub.toml");
        fs::write(&path, "cores_root = \n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("corepub.toml"));
    }

    #[test]
    fn default_has_only_extra_roots() {
        let config = Config::default();
        assert_eq!(
            config.cores_roots(&[PathBuf::from("x")]),
            vec![PathBuf::from("x")]
        );
    }

    #[test]
    fn home_prefix_expands() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                resolve_root(Path::new("~/cores"), Some(Path::new("/etc"))),
                home.join("cores")
            );
        }
    }
}
