//! core::descriptor
//!
//! Core descriptor files.
//!
//! # Format
//!
//! A descriptor is a TOML file with the `.core` extension:
//!
//! ```toml
//! name = "acme:libs:widget:1.0"
//! description = "A widget"
//! depend = ["acme:libs:gadget", "acme:libs:fifo:2.1"]
//!
//! [provider]
//! name = "github"
//! user = "acme"
//! repo = "widget"
//! version = "v1.0"
//! ```
//!
//! Other top-level keys and tables are allowed and ignored here. The
//! `[provider]` table is optional; when present it must be complete.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::CoreIdentifier;
use crate::provider::ProviderInfo;

/// File extension of descriptor files.
pub const DESCRIPTOR_EXTENSION: &str = "core";

/// Extension appended to a descriptor path to find its detached signature.
pub const SIGNATURE_EXTENSION: &str = "sig";

/// Raw descriptor schema.
#[derive(Debug, Clone, Deserialize)]
struct DescriptorFile {
    name: CoreIdentifier,
    #[serde(default)]
    depend: Vec<String>,
    #[serde(default)]
    provider: Option<ProviderInfo>,
}

/// A loaded core descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreDescriptor {
    /// Canonical identifier from the `name` key
    pub id: CoreIdentifier,
    /// Path of the descriptor file
    pub core_file: PathBuf,
    /// Directory containing the descriptor
    pub core_root: PathBuf,
    /// Dependency references (`v:l:n` or `v:l:n:ver`)
    pub depends: Vec<String>,
    /// Declared provider, if any
    pub provider: Option<ProviderInfo>,
}

impl CoreDescriptor {
    /// Parse descriptor text that was read from `path`.
    ///
    /// # Errors
    ///
    /// Returns the parser's message unchanged.
    pub fn parse(path: &Path, text: &str) -> Result<Self, String> {
        let file: DescriptorFile = toml::from_str(text).map_err(|e| e.message().to_string())?;
        let core_root = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            id: file.name,
            core_file: path.to_path_buf(),
            core_root,
            depends: file.depend,
            provider: file.provider,
        })
    }

    /// Path of the detached signature, `<core_file>.sig`.
    pub fn signature_file(&self) -> PathBuf {
        let mut path = OsString::from(self.core_file.as_os_str());
        path.push(".");
        path.push(SIGNATURE_EXTENSION);
        PathBuf::from(path)
    }
}
