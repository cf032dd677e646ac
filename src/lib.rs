//! corepub - publish IP core descriptors to a core registry
//!
//! corepub resolves a core by name against the descriptors found under the
//! configured cores roots, makes sure it declares (or can be given) a
//! publishable source provider, and uploads its descriptor, plus an
//! optional detached signature, to a registry.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, wires collaborators)
//! - [`core`] - Core identifiers, descriptors, index, name resolution, config
//! - [`provider`] - Provider kinds and inference from a git checkout
//! - [`publish`] - The publish workflow: provider check, confirmation, upload
//! - [`ui`] - Console output and confirmation prompts
//!
//! # Guarantees
//!
//! 1. A core with an unsupported provider never reaches the network
//! 2. Descriptors are only ever appended to, never rewritten
//! 3. Declining confirmation reads no file and sends no request

pub mod cli;
pub mod core;
pub mod provider;
pub mod publish;
pub mod ui;
