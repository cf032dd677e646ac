//! ui::output
//!
//! Console output.
//!
//! # Design
//!
//! Progress lines go to stdout and are dropped in quiet mode. Warnings,
//! errors and `[debug]` lines go to stderr. Provider sections printed for
//! the operator to copy are written with [`block`], unprefixed and
//! regardless of verbosity, since they are the result of the run.

use std::fmt::Display;

/// How much the run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only errors and provider sections
    Quiet,
    /// Progress lines and warnings
    #[default]
    Normal,
    /// Everything, plus `[debug]` lines on stderr
    Debug,
}

impl Verbosity {
    /// Pick the level from `--quiet` and `--debug`; quiet wins.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }
}

/// A progress line on stdout.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("{}", message);
    }
}

/// A `[debug]` line on stderr, shown only with `--debug`.
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// The error that ends the run. Always shown.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// A `warning:` line on stderr, dropped in quiet mode.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        eprintln!("warning: {}", message);
    }
}

/// Text the operator is meant to copy, printed verbatim.
pub fn block(text: &str) {
    println!("{}", text.trim_end());
}
