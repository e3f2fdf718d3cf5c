//! tagmeta - custom-element attribute manifests from companion TypeScript types
//!
//! tagmeta finds custom-element registrations in a project, reads each
//! element's configuration type from its companion `*.types.d.ts` /
//! `*.types.ts` file and writes the configurable attributes into a
//! custom-elements manifest.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Attribute extraction engine and project analysis

pub mod cli;
pub mod config;
pub mod core;
