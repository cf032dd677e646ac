//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive confirmation
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All console output and prompts go through this module so quiet and
//! debug modes behave the same everywhere.

pub mod output;
pub mod prompts;
