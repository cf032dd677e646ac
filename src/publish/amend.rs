//! publish::amend
//!
//! Append a provider section to a descriptor file.
//!
//! The file is opened append-only: existing content is never read,
//! truncated, or rewritten.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to append to a descriptor.
#[derive(Debug, Error)]
#[error("failed to update core file '{}': {source}", path.display())]
pub struct AmendError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Append `section` to `core_file`, separated from existing content by a
/// blank line.
///
/// Returns the number of bytes written.
pub fn append_section(core_file: &Path, section: &str) -> Result<usize, AmendError> {
    let block = format!("\n{}\n", section);
    let wrap = |source| AmendError {
        path: core_file.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .append(true)
        .open(core_file)
        .map_err(wrap)?;
    file.write_all(block.as_bytes()).map_err(wrap)?;
    Ok(block.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SECTION: &str = "[provider]\nname = \"github\"\nuser = \"acme\"\nrepo = \"widget\"\nversion = \"abc\"\n";

    #[test]
    fn appends_without_truncating() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("widget.core");
        let original = "name = \"acme:libs:widget:1.0\"\n";
        fs::write(&path, original).unwrap();
        let before = fs::metadata(&path).unwrap().len();

        let written = append_section(&path, SECTION).unwrap();

        let after = fs::metadata(&path).unwrap().len();
        assert_eq!(after, before + written as u64);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(original));
        assert!(content.ends_with(&format!("\n{}\n", SECTION)));
    }

    #[test]
    fn missing_file_is_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.core");
        let err = append_section(&path, SECTION).unwrap_err();
        assert_eq!(err.path, path);
        assert!(!path.exists());
    }
}
