//! core::resolve
//!
//! Resolve a user-supplied core name to a single core.
//!
//! # Rules
//!
//! - A name containing `:` is already qualified and is passed to the index
//!   unchanged.
//! - A bare name is compared, ignoring case, against the name segment of
//!   every known core. Matches are collected as `vendor:library:name`, so
//!   several versions of one core count once.
//!   - No match: the bare name goes to the index, which reports it missing.
//!   - One match: that core is loaded (highest version).
//!   - Several: [`ResolveError::AmbiguousName`] lists them in sorted order.

use std::collections::BTreeSet;

use thiserror::Error;

use super::descriptor::CoreDescriptor;
use super::index::{CoreIndex, IndexError};
use super::types::{CoreIdentifier, SEPARATOR};

/// Errors from resolving a core name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A bare name matched more than one core.
    #[error("'{name}' is ambiguous. Potential matches: {}", quote_all(.candidates))]
    AmbiguousName {
        /// The name as given
        name: String,
        /// Every matching `vendor:library:name`, sorted
        candidates: Vec<String>,
    },

    /// Loading the resolved core failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

fn quote_all(candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn `name` into the reference the index should load.
///
/// # Errors
///
/// Returns [`ResolveError::AmbiguousName`] if a bare name matches several
/// cores.
pub fn resolve_name(name: &str, known: &[CoreIdentifier]) -> Result<String, ResolveError> {
    if name.contains(SEPARATOR) {
        return Ok(name.to_string());
    }

    let matches: BTreeSet<String> = known
        .iter()
        .filter(|id| id.matches_name(name))
        .map(CoreIdentifier::package)
        .collect();

    let mut matches = matches.into_iter();
    match (matches.next(), matches.next()) {
        (None, _) => Ok(name.to_string()),
        (Some(only), None) => Ok(only),
        (Some(first), Some(second)) => {
            let mut candidates = vec![first, second];
            candidates.extend(matches);
            Err(ResolveError::AmbiguousName {
                name: name.to_string(),
                candidates,
            })
        }
    }
}

/// Resolve `name` against `index` and load the core it refers to.
pub fn resolve_core(index: &dyn CoreIndex, name: &str) -> Result<CoreDescriptor, ResolveError> {
    let reference = resolve_name(name, &index.list_identifiers())?;
    Ok(index.load_core(&reference)?)
}
