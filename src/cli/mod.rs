//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Load configuration and index the cores roots
//! - Resolve the requested core and hand it to [`crate::publish`]
//!
//! The workflow itself never touches the terminal or spawns processes
//! directly; this layer supplies the real [`GitCli`] and
//! [`TerminalConfirm`] implementations.

pub mod args;

pub use args::Cli;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::core::index::CoreLibrary;
use crate::core::resolve::resolve_core;
use crate::provider::GitCli;
use crate::publish::{publish, PublishContext, PublishOutcome};
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts::TerminalConfirm;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<PublishOutcome> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = config.path() {
        output::debug(format!("using config {}", path.display()), verbosity);
    }

    let roots = config.cores_roots(&cli.cores_root);
    let library = CoreLibrary::scan(&roots);
    for warning in library.warnings() {
        output::warn(
            format!("{}: {}", warning.path.display(), warning.message),
            verbosity,
        );
    }
    output::debug(
        format!("indexed {} cores from {} roots", library.len(), roots.len()),
        verbosity,
    );

    let core = resolve_core(&library, &cli.core)?;

    let ctx = PublishContext {
        registry: cli.server,
        yes: cli.yes,
        autoprovider: cli.autoprovider,
        verbosity,
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = rt.block_on(publish(
        &ctx,
        &core,
        &GitCli::new(verbosity),
        &mut TerminalConfirm,
    ))?;
    Ok(outcome)
}
