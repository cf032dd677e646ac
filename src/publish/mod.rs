//! publish
//!
//! The publish workflow for a resolved core.
//!
//! # Lifecycle
//!
//! ```text
//! ResolveProvider -> ConfirmUpload -> Upload -> Interpret -> Done
//! ```
//!
//! Every step may end the workflow. Nothing is retried.
//!
//! 1. **ResolveProvider**: a declared provider must be publishable. Without
//!    one, the checkout is probed. A publishable guess is either printed as
//!    guidance or, with `--autoprovider`, appended to the descriptor. Both
//!    end the run; the operator reviews the change and publishes again.
//! 2. **ConfirmUpload**: unless `--yes`, the operator must type `yes`.
//!    Declining is a normal ending, before any file is read or any request
//!    is made.
//! 3. **Upload** / **Interpret**: see [`upload`].
//!
//! # Modules
//!
//! - [`amend`]: Append-only descriptor amendment
//! - [`upload`]: Multipart upload and response classification

pub mod amend;
pub mod upload;

use std::path::PathBuf;

use reqwest::Client;
use thiserror::Error;

use crate::core::descriptor::CoreDescriptor;
use crate::core::types::CoreIdentifier;
use crate::provider::{guess_provider, ProviderGuess, ProviderKind, VcsError, VcsTool};
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts::{Confirm, PromptError, CONFIRM_TOKEN};

use amend::AmendError;
use upload::{UploadError, UploadOutcome};

/// Settings for one publish invocation.
#[derive(Debug, Clone)]
pub struct PublishContext {
    /// Registry base URI
    pub registry: String,
    /// Skip the confirmation prompt
    pub yes: bool,
    /// Append a guessed provider section to the descriptor
    pub autoprovider: bool,
    /// Output verbosity
    pub verbosity: Verbosity,
}

/// Non-error endings of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The registry accepted the core.
    Published { core: CoreIdentifier },
    /// A provider was guessed and printed, nothing was changed.
    ProviderSuggested { section: String },
    /// A provider was guessed and appended to the descriptor.
    DescriptorAmended { path: PathBuf, section: String },
    /// The operator declined the upload.
    Aborted,
}

/// Errors that end the workflow.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The descriptor declares a provider the registry does not accept.
    #[error("the provider for this core is '{0}' which is not yet supported for publishing")]
    UnsupportedProvider(ProviderKind),

    /// No provider is declared and none could be inferred.
    #[error("no provider is given in the core file or guessable from the current project")]
    NoProviderGuessable,

    /// No provider is declared and the inferred one is not publishable.
    #[error(
        "no provider is given in the core file, and the current project appears to use '{0}', \
         which is not supported for publishing"
    )]
    GuessedProviderUnsupported(ProviderKind),

    /// The registry refused the core.
    #[error("{message}")]
    UploadConflict { message: String },

    /// The registry answered with an unexpected status.
    #[error("request returned http result {status} {reason}\n{body}")]
    UploadHttpFailure {
        status: u16,
        reason: String,
        body: String,
    },

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Amend(#[from] AmendError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Result of the ResolveProvider step.
enum ProviderStep {
    /// Continue to the upload with this provider.
    Ready(ProviderKind),
    /// The workflow ends here.
    Done(PublishOutcome),
}

/// Run the publish workflow for `core`.
///
/// # Arguments
///
/// * `ctx` - Registry and flags for this invocation
/// * `core` - The resolved core
/// * `vcs` - Version-control access used when no provider is declared
/// * `confirm` - Confirmation capability, unused with `ctx.yes`
pub async fn publish(
    ctx: &PublishContext,
    core: &CoreDescriptor,
    vcs: &dyn VcsTool,
    confirm: &mut dyn Confirm,
) -> Result<PublishOutcome, PublishError> {
    let verbosity = ctx.verbosity;

    let provider = match resolve_provider(ctx, core, vcs)? {
        ProviderStep::Ready(kind) => kind,
        ProviderStep::Done(outcome) => return Ok(outcome),
    };

    output::print(format!("Core provider: {}", provider), verbosity);
    output::print(
        format!("Publish core file: {}", core.core_file.display()),
        verbosity,
    );
    output::print(format!("to api at: {}", ctx.registry), verbosity);

    if ctx.yes {
        output::print("without confirmation", verbosity);
    } else if !confirm.confirm(&format!("Confirm by typing '{}'", CONFIRM_TOKEN))? {
        output::print("Aborted.", verbosity);
        return Ok(PublishOutcome::Aborted);
    }

    let client = Client::new();
    match upload::upload(&client, &ctx.registry, core, verbosity).await? {
        UploadOutcome::Success { core } => {
            output::print(format!("Core {} published successfully", core), verbosity);
            Ok(PublishOutcome::Published { core })
        }
        UploadOutcome::Conflict { message } => Err(PublishError::UploadConflict { message }),
        UploadOutcome::HttpFailure {
            status,
            reason,
            body,
        } => Err(PublishError::UploadHttpFailure {
            status,
            reason,
            body,
        }),
    }
}

fn resolve_provider(
    ctx: &PublishContext,
    core: &CoreDescriptor,
    vcs: &dyn VcsTool,
) -> Result<ProviderStep, PublishError> {
    let verbosity = ctx.verbosity;

    if let Some(provider) = &core.provider {
        let kind = provider.kind();
        return if kind.is_publishable() {
            Ok(ProviderStep::Ready(kind))
        } else {
            Err(PublishError::UnsupportedProvider(kind))
        };
    }

    let guess = guess_provider(vcs, &core.core_root)?;
    let (kind, section) = check_guess(&guess)?;
    output::print(
        format!(
            "No provider is given in core file, but the current project seems to be on {}.",
            kind
        ),
        verbosity,
    );

    if !ctx.autoprovider {
        output::print(
            "The following provider section can be added to the core file if the \
             --autoprovider flag is given to this command.",
            verbosity,
        );
        output::block(section);
        return Ok(ProviderStep::Done(PublishOutcome::ProviderSuggested {
            section: section.to_string(),
        }));
    }

    output::print(
        "Adding the following provider section to the core file.",
        verbosity,
    );
    output::block(section);
    amend::append_section(&core.core_file, section)?;
    output::print("Now retry publishing.", verbosity);

    Ok(ProviderStep::Done(PublishOutcome::DescriptorAmended {
        path: core.core_file.clone(),
        section: section.to_string(),
    }))
}

/// Accept a guess only if it names a publishable provider.
fn check_guess(guess: &ProviderGuess) -> Result<(ProviderKind, &str), PublishError> {
    if !guess.found() {
        return Err(PublishError::NoProviderGuessable);
    }
    match (guess.kind(), guess.section()) {
        (Some(kind), Some(section)) if kind.is_publishable() => Ok((kind, section)),
        (Some(kind), _) => Err(PublishError::GuessedProviderUnsupported(kind)),
        (None, _) => Err(PublishError::NoProviderGuessable),
    }
}
