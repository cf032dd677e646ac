//! provider::probe
//!
//! Guess a core's provider from the version-control checkout it lives in.
//!
//! # Design
//!
//! The probe needs two pieces of text from the version-control tool: the
//! verbose remote listing and the header of the most recent commit. Those
//! come from a [`VcsTool`], so tests can substitute canned output for a
//! real `git` process. [`GitCli`] is the production implementation.
//!
//! Only the first fetch remote in listing order is considered. Remotes are
//! never merged or ranked.
//!
//! # Failure handling
//!
//! - `git` cannot be spawned: [`VcsError::Unavailable`]
//! - `git` exits non-zero (not a repository, no commits): treated as empty
//!   output, so the guess is "not found" or the version marker is empty

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use super::{detect_provider, ProviderKind};
use crate::ui::output::{self, Verbosity};

/// Marker closing a fetch line in `git remote -v` output.
const FETCH_MARKER: &str = "(fetch)";

/// First word of the header line printed by `git log`.
const COMMIT_MARKER: &str = "commit";

/// Errors from invoking the version-control tool.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The tool could not be started at all.
    #[error("failed to run '{tool}' in {}: {message}", dir.display())]
    Unavailable {
        tool: String,
        dir: PathBuf,
        message: String,
    },
}

/// Read-only access to a version-control checkout.
pub trait VcsTool {
    /// Verbose remote listing (`git remote -v`).
    fn list_remotes(&self, dir: &Path) -> Result<String, VcsError>;

    /// The most recent commit as printed by `git log -n 1`.
    fn last_commit(&self, dir: &Path) -> Result<String, VcsError>;
}

/// [`VcsTool`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    verbosity: Verbosity,
}

impl GitCli {
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_program("git", verbosity)
    }

    /// Use a specific executable instead of `git` from `PATH`.
    pub fn with_program(program: impl Into<String>, verbosity: Verbosity) -> Self {
        Self {
            program: program.into(),
            verbosity,
        }
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, VcsError> {
        output::debug(
            format!("running {} {} in {}", self.program, args.join(" "), dir.display()),
            self.verbosity,
        );

        let result = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| VcsError::Unavailable {
                tool: self.program.clone(),
                dir: dir.to_path_buf(),
                message: e.to_string(),
            })?;

        if !result.status.success() {
            output::debug(
                format!(
                    "{} {} exited with {}: {}",
                    self.program,
                    args.join(" "),
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
                self.verbosity,
            );
            return Ok(String::new());
        }

        Ok(String::from_utf8_lossy(&result.stdout).into_owned())
    }
}

impl VcsTool for GitCli {
    fn list_remotes(&self, dir: &Path) -> Result<String, VcsError> {
        self.run(dir, &["remote", "-v"])
    }

    fn last_commit(&self, dir: &Path) -> Result<String, VcsError> {
        self.run(dir, &["log", "-n", "1"])
    }
}

/// Outcome of probing a checkout for its provider.
///
/// A guess that was not found never carries a section text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderGuess {
    found: bool,
    kind: Option<ProviderKind>,
    section: Option<String>,
}

impl ProviderGuess {
    /// Nothing usable was found.
    pub fn not_found() -> Self {
        Self {
            found: false,
            kind: None,
            section: None,
        }
    }

    /// A provider was recognised; its descriptor section is rendered now.
    pub fn recognized(provider: &super::ProviderInfo) -> Self {
        Self {
            found: true,
            kind: Some(provider.kind()),
            section: Some(provider.render_section()),
        }
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn kind(&self) -> Option<ProviderKind> {
        self.kind
    }

    /// The `[provider]` section to add to the descriptor.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }
}

/// Probe `dir` and guess which provider hosts it.
///
/// # Errors
///
/// Only fails if the version-control tool cannot be run.
pub fn guess_provider(tool: &dyn VcsTool, dir: &Path) -> Result<ProviderGuess, VcsError> {
    let remotes = tool.list_remotes(dir)?;
    let Some(url) = first_fetch_url(&remotes) else {
        return Ok(ProviderGuess::not_found());
    };

    let version = commit_marker(&tool.last_commit(dir)?);

    Ok(match detect_provider(url, &version) {
        Some(provider) => ProviderGuess::recognized(&provider),
        None => ProviderGuess::not_found(),
    })
}

/// URL of the first fetch remote, in listing order.
///
/// Lines look like `origin\thttps://github.com/acme/widget.git (fetch)`; the
/// URL is the token right before the marker.
fn first_fetch_url(listing: &str) -> Option<&str> {
    let line = listing
        .lines()
        .map(str::trim)
        .find(|line| line.ends_with(FETCH_MARKER))?;

    let mut tokens = line.split_whitespace().rev();
    tokens.next();
    tokens.next()
}

/// Commit id from a `commit <id> ...` header, or an empty string.
fn commit_marker(log: &str) -> String {
    let Some(header) = log.trim().lines().next() else {
        return String::new();
    };
    let tokens: Vec<&str> = header.split_whitespace().collect();
    match tokens.as_slice() {
        [marker, id, ..] if *marker == COMMIT_MARKER => id.to_string(),
        _ => String::new(),
    }
}
