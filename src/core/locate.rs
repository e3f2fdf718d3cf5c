//! Companion type-declaration file lookup.
//!
//! A module `src/date-picker.ts` describes its configuration in a sibling
//! `src/date-picker.types.d.ts` (preferred) or `src/date-picker.types.ts`.

use std::path::{Path, PathBuf};

/// Base name of a module path with its extension stripped.
///
/// Only the last extension is removed: `foo.element.ts` → `foo.element`.
pub fn module_base_name(module_path: &Path) -> Option<String> {
    module_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// Candidate companion paths in probe order.
pub fn companion_candidates(module_path: &Path) -> Vec<PathBuf> {
    let Some(base) = module_base_name(module_path) else {
        return Vec::new();
    };
    let dir = module_path.parent().unwrap_or_else(|| Path::new(""));

    vec![
        dir.join(format!("{base}.types.d.ts")),
        dir.join(format!("{base}.types.ts")),
    ]
}

/// First companion file that exists on disk.
pub fn locate_companion(module_path: &Path) -> Option<PathBuf> {
    companion_candidates(module_path)
        .into_iter()
        .find(|candidate| candidate.is_file())
}
