//! core
//!
//! Core identities, descriptors, and the index they are loaded from.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CoreIdentifier, version ordering
//! - [`descriptor`] - Descriptor file schema
//! - [`index`] - Index of cores found under the cores roots
//! - [`resolve`] - Core name resolution with ambiguity detection
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod descriptor;
pub mod index;
pub mod resolve;
pub mod types;
