//! core::index
//!
//! Index of the cores found under the configured cores roots.
//!
//! # Design
//!
//! [`CoreIndex`] is the seam between name resolution and descriptor
//! loading. [`CoreLibrary`] implements it by walking every cores root for
//! `*.core` files once, up front.
//!
//! Scanning is tolerant: a file that is not valid TOML, or has no valid
//! `name`, is skipped with a warning. A file whose `name` is valid but whose
//! remaining content does not match the descriptor schema stays in the
//! index, and loading it reports the parser's message.
//!
//! A file that is not valid TOML has no readable identifier. It is kept
//! aside, and a lookup that finds nothing reports its parser message when
//! the file stem equals the requested core's name.
//!
//! # Lookups
//!
//! [`CoreIndex::load_core`] accepts:
//! - `vendor:library:name:version` - that exact core
//! - `vendor:library:name` - the highest known version of that core
//!
//! Dependencies are checked transitively before a core is returned.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::descriptor::{CoreDescriptor, DESCRIPTOR_EXTENSION};
use super::types::{compare_versions, CoreIdentifier, SEPARATOR};

/// Errors from loading a core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// No descriptor matches the requested name.
    #[error("'{0}' not found")]
    NotFound(String),

    /// The core, or one of its dependencies, requires a core that is not
    /// in the index.
    #[error("'{core}' or any of its dependencies requires '{requirement}', but this core was not found")]
    DependencyUnsatisfied {
        /// The core that was requested
        core: String,
        /// The reference that could not be satisfied
        requirement: String,
    },

    /// A descriptor could not be parsed.
    #[error("{}: {message}", path.display())]
    DescriptorSyntax {
        /// The descriptor file
        path: PathBuf,
        /// The parser's message
        message: String,
    },
}

/// Source of core identifiers and descriptors.
pub trait CoreIndex {
    /// Every identifier in the index.
    fn list_identifiers(&self) -> Vec<CoreIdentifier>;

    /// Load the descriptor for `name`, checking its dependencies.
    fn load_core(&self, name: &str) -> Result<CoreDescriptor, IndexError>;
}

/// Something noteworthy found while scanning cores roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
struct Entry {
    path: PathBuf,
    descriptor: Result<CoreDescriptor, String>,
}

/// A descriptor file that is not valid TOML.
#[derive(Debug, Clone)]
struct Unparsed {
    path: PathBuf,
    message: String,
}

/// Cores discovered on disk.
#[derive(Debug, Default)]
pub struct CoreLibrary {
    entries: BTreeMap<CoreIdentifier, Entry>,
    unparsed: Vec<Unparsed>,
    warnings: Vec<ScanWarning>,
}

impl CoreLibrary {
    /// Scan `roots` in order for descriptor files.
    ///
    /// Later roots override earlier ones when two files declare the same
    /// identifier.
    pub fn scan(roots: &[PathBuf]) -> Self {
        let mut library = Self::default();
        for root in roots {
            library.scan_root(root);
        }
        library
    }

    /// Warnings collected while scanning.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scan_root(&mut self, root: &Path) {
        if !root.is_dir() {
            self.warn(root, "cores root does not exist or is not a directory");
            return;
        }

        for item in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    self.warn(&path, &e.to_string());
                    continue;
                }
            };
            let is_descriptor = item.file_type().is_file()
                && item.path().extension().and_then(|e| e.to_str()) == Some(DESCRIPTOR_EXTENSION);
            if is_descriptor {
                self.add_file(item.path());
            }
        }
    }

    fn add_file(&mut self, path: &Path) {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => return self.warn(path, &format!("failed to read descriptor: {}", e)),
        };

        // The identifier must be readable for the file to be indexed at all.
        let table: toml::Table = match text.parse() {
            Ok(table) => table,
            Err(e) => {
                self.unparsed.push(Unparsed {
                    path: path.to_path_buf(),
                    message: e.message().to_string(),
                });
                return self.warn(path, &format!("failed to parse descriptor: {}", e.message()));
            }
        };
        let id = match table.get("name").and_then(|v| v.as_str()) {
            Some(name) => match CoreIdentifier::parse(name) {
                Ok(id) => id,
                Err(e) => return self.warn(path, &e.to_string()),
            },
            None => return self.warn(path, "descriptor has no 'name'"),
        };

        let entry = Entry {
            path: path.to_path_buf(),
            descriptor: CoreDescriptor::parse(path, &text),
        };
        if let Some(previous) = self.entries.insert(id.clone(), entry) {
            self.warn(
                path,
                &format!("replaces {} from {}", id, previous.path.display()),
            );
        }
    }

    fn warn(&mut self, path: &Path, message: &str) {
        self.warnings.push(ScanWarning {
            message: message.to_string(),
            path: path.to_path_buf(),
        });
    }

    /// Find the entry a `v:l:n` or `v:l:n:ver` reference points at.
    fn lookup(&self, reference: &str) -> Option<&Entry> {
        if reference.split(SEPARATOR).count() == 3 {
            self.entries
                .iter()
                .filter(|(id, _)| id.satisfies(reference))
                .max_by(|(a, _), (b, _)| version_order(a, b))
                .map(|(_, entry)| entry)
        } else {
            let id = CoreIdentifier::parse(reference).ok()?;
            self.entries.get(&id)
        }
    }

    /// The error for a reference nothing in the index satisfies.
    fn missing(&self, reference: &str, otherwise: IndexError) -> IndexError {
        let name = reference.split(SEPARATOR).nth(2).unwrap_or(reference);
        self.unparsed
            .iter()
            .find(|file| {
                file.path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem.eq_ignore_ascii_case(name))
            })
            .map(|file| IndexError::DescriptorSyntax {
                path: file.path.clone(),
                message: file.message.clone(),
            })
            .unwrap_or(otherwise)
    }

    fn parsed<'a>(entry: &'a Entry) -> Result<&'a CoreDescriptor, IndexError> {
        entry
            .descriptor
            .as_ref()
            .map_err(|message| IndexError::DescriptorSyntax {
                path: entry.path.clone(),
                message: message.clone(),
            })
    }

    fn check_dependencies(&self, requested: &str, root: &CoreDescriptor) -> Result<(), IndexError> {
        let mut visited = BTreeSet::new();
        visited.insert(root.id.clone());
        let mut pending: Vec<String> = root.depends.clone();

        while let Some(reference) = pending.pop() {
            let entry = self.lookup(&reference).ok_or_else(|| {
                self.missing(
                    &reference,
                    IndexError::DependencyUnsatisfied {
                        core: requested.to_string(),
                        requirement: reference.clone(),
                    },
                )
            })?;
            let dependency = Self::parsed(entry)?;
            if visited.insert(dependency.id.clone()) {
                pending.extend(dependency.depends.iter().cloned());
            }
        }
        Ok(())
    }
}

fn version_order(a: &CoreIdentifier, b: &CoreIdentifier) -> Ordering {
    compare_versions(a.version(), b.version())
}

impl CoreIndex for CoreLibrary {
    fn list_identifiers(&self) -> Vec<CoreIdentifier> {
        self.entries.keys().cloned().collect()
    }

    fn load_core(&self, name: &str) -> Result<CoreDescriptor, IndexError> {
        let entry = self
            .lookup(name)
            .ok_or_else(|| self.missing(name, IndexError::NotFound(name.to_string())))?;
        let core = Self::parsed(entry)?;
        self.check_dependencies(name, core)?;
        Ok(core.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, text: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn core(name: &str, depends: &[&str]) -> String {
        let depends: Vec<String> = depends.iter().map(|d| format!("\"{}\"", d)).collect();
        format!("name = \"{}\"\ndepend = [{}]\n", name, depends.join(", "))
    }

    mod scan {
        use super::*;

        #[test]
        fn finds_nested_descriptors() {
            let dir = TempDir::new().unwrap();
            write(dir.path(), "a/widget.core", &core("acme:libs:widget:1.0", &[]));
            write(dir.path(), "b/c/gadget.core", &core("acme:libs:gadget:2.0", &[]));
            write(dir.path(), "b/readme.txt", "not a core");

            let library = CoreLibrary::scan(&[dir.path().to_path_buf()]);
            let ids: Vec<String> = library
                .list_identifiers()
                .iter()
                .map(ToString::to_string)
                .collect();
            assert_eq!(ids, vec!["acme:libs:gadget:2.0", "acme:libs:widget:1.0"]);
            assert!(library.warnings().is_empty());
        }

        #[test]
        fn missing_root_warns() {
            let library = CoreLibrary::scan(&[PathBuf::from("/nonexistent/corepub/root")]);
            assert!(library.is_empty());
            assert_eq!(library.warnings().len(), 1);
        }

        #[test]
        fn invalid_toml_is_skipped_with_warning() {
            let dir = TempDir::new().unwrap();
            write(dir.path(), "bad.core", "name = [unterminated\n");
            let library = CoreLibrary::scan(&[dir.path().to_path_buf()]);
            assert!(library.is_empty());
            assert_eq!(library.warnings().len(), 1);
        }

        #[test]
        fn later_root_overrides() {
            let first = TempDir::new().unwrap();
            let second = TempDir::new().unwrap();
            write(first.path(), "w.core", &core("acme:libs:widget:1.0", &[]));
            let winner = write(second.path(), "w.core", &core("acme:libs:widget:1.0", &[]));

            let library =
                CoreLibrary::scan(&[first.path().to_path_buf(), second.path().to_path_buf()]);
            assert_eq!(library.len(), 1);
            assert_eq!(library.warnings().len(), 1);
            let loaded = library.load_core("acme:libs:widget:1.0").unwrap();
            assert_eq!(loaded.core_file, winner);
        }
    }

    mod load {
        use super::*;

        fn library(files: &[(&str, String)]) -> (TempDir, CoreLibrary) {
            let dir = TempDir::new().unwrap();
            for (rel, text) in files {
                write(dir.path(), rel, text);
            }
            let library = CoreLibrary::scan(&[dir.path().to_path_buf()]);
            (dir, library)
        }

        #[test]
        fn exact_identifier() {
            let (_dir, library) = library(&[("w.core", core("acme:libs:widget:1.0", &[]))]);
            let loaded = library.load_core("acme:libs:widget:1.0").unwrap();
            assert_eq!(loaded.id.to_string(), "acme:libs:widget:1.0");
        }

        #[test]
        fn package_picks_highest_version() {
            let (_dir, library) = library(&[
                ("w1.core", core("acme:libs:widget:1.9", &[])),
                ("w2.core", core("acme:libs:widget:1.10", &[])),
            ]);
            let loaded = library.load_core("acme:libs:widget").unwrap();
            assert_eq!(loaded.id.version(), "1.10");
        }

        #[test]
        fn not_found() {
            let (_dir, library) = library(&[("w.core", core("acme:libs:widget:1.0", &[]))]);
            assert_eq!(
                library.load_core("acme:libs:widget:2.0"),
                Err(IndexError::NotFound("acme:libs:widget:2.0".into()))
            );
            assert_eq!(
                library.load_core("widget"),
                Err(IndexError::NotFound("widget".into()))
            );
        }

        #[test]
        fn transitive_dependency_missing() {
            let (_dir, library) = library(&[
                ("w.core", core("acme:libs:widget:1.0", &["acme:libs:gadget"])),
                ("g.core", core("acme:libs:gadget:1.0", &["acme:libs:fifo:3.0"])),
            ]);
            assert_eq!(
                library.load_core("acme:libs:widget"),
                Err(IndexError::DependencyUnsatisfied {
                    core: "acme:libs:widget".into(),
                    requirement: "acme:libs:fifo:3.0".into(),
                })
            );
        }

        #[test]
        fn dependency_cycle_terminates() {
            let (_dir, library) = library(&[
                ("a.core", core("acme:libs:a:1.0", &["acme:libs:b"])),
                ("b.core", core("acme:libs:b:1.0", &["acme:libs:a"])),
            ]);
            assert!(library.load_core("acme:libs:a:1.0").is_ok());
        }

        #[test]
        fn toml_error_reported_for_matching_file() {
            let text = "name = \"acme:libs:widget:1.0\"\ndescription = \"unterminated\n";
            let (_dir, library) = library(&[
                ("widget/widget.core", text.to_string()),
                ("gadget.core", core("acme:libs:gadget:1.0", &[])),
            ]);
            assert_eq!(library.warnings().len(), 1);

            for name in ["acme:libs:widget:1.0", "acme:libs:widget", "widget", "Widget"] {
                match library.load_core(name) {
                    Err(IndexError::DescriptorSyntax { path, message }) => {
                        assert!(path.ends_with("widget/widget.core"));
                        assert!(!message.is_empty());
                        assert_eq!(
                            library.warnings()[0].message,
                            format!("failed to parse descriptor: {}", message)
                        );
                    }
                    other => panic!("expected syntax error for {}, got {:?}", name, other),
                }
            }
            assert_eq!(
                library.load_core("acme:libs:fifo:1.0"),
                Err(IndexError::NotFound("acme:libs:fifo:1.0".into()))
            );
        }

        #[test]
        fn toml_error_in_dependency_is_reported() {
            let (_dir, library) = library(&[
                ("top.core", core("acme:libs:top:1.0", &["acme:libs:fifo"])),
                ("fifo.core", "name = [\n".to_string()),
            ]);
            assert!(matches!(
                library.load_core("acme:libs:top:1.0"),
                Err(IndexError::DescriptorSyntax { path, .. }) if path.ends_with("fifo.core")
            ));
        }

        #[test]
        fn schema_error_reports_parser_message() {
            let text = "name = \"acme:libs:widget:1.0\"\n\n[provider]\nname = \"github\"\nuser = \"acme\"\n";
            let (_dir, library) = library(&[("w.core", text.to_string())]);
            match library.load_core("acme:libs:widget:1.0") {
                Err(IndexError::DescriptorSyntax { path, message }) => {
                    assert!(path.ends_with("w.core"));
                    assert!(message.contains("repo"), "unexpected message: {}", message);
                }
                other => panic!("expected syntax error, got {:?}", other),
            }
        }
    }
}
