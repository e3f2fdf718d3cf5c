//! Attribute extraction engine.
//!
//! A module's `customElements.define(...)` calls become declarations in a
//! [`manifest::ModuleDocument`]; the configuration type of each element is
//! read from its companion `*.types.d.ts` / `*.types.ts` file and merged as
//! attributes.
//!
//! ## Module Structure
//!
//! - `registration`: recognizes registration calls in module source
//! - `locate`, `naming`: companion file lookup and name conventions
//! - `syntactic`, `semantic`: the two extraction strategies
//! - `cache`: bounded cache of semantic compilation contexts
//! - `mapper`, `registry`: attribute inference and declaration merge
//! - `plugin`: per-registration driver with the fallback decision table
//! - `project`, `file_scanner`: whole-project pass

pub mod cache;
pub mod decls;
pub mod file_scanner;
pub mod locate;
pub mod manifest;
pub mod mapper;
pub mod naming;
pub mod parsers;
pub mod plugin;
pub mod project;
pub mod registration;
pub mod registry;
pub mod semantic;
pub mod shape;
pub mod syntactic;

pub use cache::CompilationCache;
pub use manifest::{Attribute, Declaration, ModuleDocument, PackageManifest};
pub use plugin::{AttributePlugin, PluginOptions, PluginOutcome, Provenance};
pub use project::{ProjectReport, analyze_project};
pub use shape::{ExtractError, ExtractOutcome, TypeShape};
