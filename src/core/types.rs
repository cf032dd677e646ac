//! core::types
//!
//! Strong types for core identities.
//!
//! # Types
//!
//! - [`CoreIdentifier`] - Validated `vendor:library:name:version` tuple
//!
//! # Validation
//!
//! Every segment must be non-empty and may not contain `:` or whitespace.
//! Invalid identifiers cannot be represented.
//!
//! # Examples
//!
//! ```
//! use corepub::core::types::CoreIdentifier;
//!
//! let id = CoreIdentifier::parse("acme:libs:widget:1.0").unwrap();
//! assert_eq!(id.name(), "widget");
//! assert_eq!(id.package(), "acme:libs:widget");
//! assert_eq!(id.to_string(), "acme:libs:widget:1.0");
//!
//! assert!(CoreIdentifier::parse("acme:libs:widget").is_err());
//! assert!(CoreIdentifier::parse("acme::widget:1.0").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between identifier segments.
pub const SEPARATOR: char = ':';

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid core identifier '{0}': expected vendor:library:name:version")]
    InvalidIdentifier(String),
}

/// A fully qualified core identifier.
///
/// The canonical form is case-preserving. Only [`CoreIdentifier::matches_name`]
/// compares case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoreIdentifier {
    vendor: String,
    library: String,
    name: String,
    version: String,
}

impl CoreIdentifier {
    /// Build an identifier from its four segments.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIdentifier` if any segment is empty or
    /// contains a separator or whitespace.
    pub fn new(
        vendor: impl Into<String>,
        library: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let id = Self {
            vendor: vendor.into(),
            library: library.into(),
            name: name.into(),
            version: version.into(),
        };
        let segments = [&id.vendor, &id.library, &id.name, &id.version];
        if segments.iter().any(|s| !valid_segment(s)) {
            return Err(TypeError::InvalidIdentifier(format!(
                "{}:{}:{}:{}",
                id.vendor, id.library, id.name, id.version
            )));
        }
        Ok(id)
    }

    /// Parse the colon-joined string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        match parts.as_slice() {
            [vendor, library, name, version] => Self::new(*vendor, *library, *name, *version)
                .map_err(|_| TypeError::InvalidIdentifier(s.to_string())),
            _ => Err(TypeError::InvalidIdentifier(s.to_string())),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The version-less `vendor:library:name` form.
    pub fn package(&self) -> String {
        format!("{}:{}:{}", self.vendor, self.library, self.name)
    }

    /// Compare the bare name segment, ignoring case.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Whether this identifier satisfies a `v:l:n` or `v:l:n:ver` reference.
    ///
    /// Package references compare case-sensitively, like the canonical form.
    pub fn satisfies(&self, reference: &str) -> bool {
        if reference.split(SEPARATOR).count() == 3 {
            self.package() == reference
        } else {
            self.to_string() == reference
        }
    }
}

impl fmt::Display for CoreIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.vendor, self.library, self.name, self.version
        )
    }
}

impl TryFrom<String> for CoreIdentifier {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CoreIdentifier> for String {
    fn from(id: CoreIdentifier) -> Self {
        id.to_string()
    }
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains(SEPARATOR) && !segment.contains(char::is_whitespace)
}

/// Order two version strings.
///
/// Versions are split on `.` and `-`; numeric components compare
/// numerically, everything else lexically. A version that is a strict
/// prefix of another sorts first (`1.0` < `1.0.1`).
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let split = |v: &str| -> Vec<String> {
        v.split(['.', '-'])
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    let (left, right) = (split(a), split(b));

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => l.cmp(r),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}
