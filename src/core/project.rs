//! Whole-project pass: scan, analyze every module in parallel, assemble the
//! package manifest.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::Config;
use crate::core::file_scanner::scan_files;
use crate::core::manifest::{ModuleDocument, PackageManifest};
use crate::core::plugin::{AttributePlugin, PluginOutcome};

/// A module that could not be read or parsed. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub path: String,
    pub message: String,
}

/// One registration handled during the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Module path relative to the project root.
    pub module: String,
    pub outcome: PluginOutcome,
}

#[derive(Debug)]
pub struct ProjectReport {
    pub manifest: PackageManifest,
    pub outcomes: Vec<RegistrationReport>,
    pub parse_failures: Vec<ParseFailure>,
    pub files_scanned: usize,
    /// Paths the scanner could not access.
    pub skipped_paths: usize,
}

pub fn analyze_project(root: &Path, config: &Config, plugin: &AttributePlugin) -> ProjectReport {
    let scan_result = scan_files(
        root,
        &config.includes,
        &config.ignores,
        config.ignore_test_files,
    );
    debug!(files = scan_result.files.len(), root = %root.display(), "scanned source tree");

    // Each worker owns its module document; only the compilation cache is shared.
    let results: Vec<_> = scan_result
        .files
        .par_iter()
        .map(|file_path| {
            let module_path = relative_module_path(root, file_path);
            let mut doc = ModuleDocument::new(module_path.clone());
            let result = fs::read_to_string(file_path)
                .map_err(anyhow::Error::from)
                .and_then(|source| plugin.analyze_module(file_path, &source, &mut doc));
            (module_path, doc, result)
        })
        .collect();

    let mut modules = Vec::new();
    let mut outcomes = Vec::new();
    let mut parse_failures = Vec::new();

    for (module_path, doc, result) in results {
        match result {
            Ok(module_outcomes) => {
                outcomes.extend(module_outcomes.into_iter().map(|outcome| RegistrationReport {
                    module: module_path.clone(),
                    outcome,
                }));
                modules.push(doc);
            }
            Err(e) => {
                warn!(path = %module_path, error = %e, "module could not be analyzed");
                parse_failures.push(ParseFailure {
                    path: module_path,
                    message: e.to_string(),
                });
            }
        }
    }

    ProjectReport {
        manifest: PackageManifest::from_modules(modules),
        outcomes,
        parse_failures,
        files_scanned: scan_result.files.len(),
        skipped_paths: scan_result.skipped_count,
    }
}

/// Forward-slash path of `file_path` relative to `root`.
fn relative_module_path(root: &Path, file_path: &Path) -> String {
    file_path
        .strip_prefix(root)
        .unwrap_or(file_path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
