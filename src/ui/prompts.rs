//! ui::prompts
//!
//! Interactive confirmation.
//!
//! # Design
//!
//! Workflows take a [`Confirm`] capability instead of reading the terminal
//! themselves, so they can be driven by a scripted answer in tests.
//! Confirmation requires typing the literal token `yes`; any other answer,
//! including an empty one or end of input, declines.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;
use thiserror::Error;

/// The only answer that confirms.
pub const CONFIRM_TOKEN: &str = "yes";

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Ask the operator to confirm an action.
pub trait Confirm {
    /// Returns `Ok(true)` only if the operator confirmed.
    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError>;
}

/// Whether `answer` confirms.
pub fn is_confirmation(answer: &str) -> bool {
    answer == CONFIRM_TOKEN
}

/// [`Confirm`] on the controlling terminal.
///
/// Uses a line editor when stdin is a terminal, and reads one plain line
/// when input is piped.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        let answer = if io::stdin().is_terminal() {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| PromptError::IoError(e.to_string()))?
        } else {
            print!("{}: ", prompt);
            io::stdout()
                .flush()
                .map_err(|e| PromptError::IoError(e.to_string()))?;
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|e| PromptError::IoError(e.to_string()))?;
            line.trim_end_matches(['\r', '\n']).to_string()
        };
        Ok(is_confirmation(&answer))
    }
}
