use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Module files, sorted.
    pub files: BTreeSet<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    if ignore_test_files {
        glob_patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                    Err(e) => warn!(pattern = %inc, error = %e, "invalid include pattern"),
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    warn!(path = %path.display(), "include path does not exist");
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if entry.file_type().is_file() && is_module_file(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

/// Script modules that may register elements. Declaration files and
/// companion `*.types.*` files describe types only.
fn is_module_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") || name.contains(".types.") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mjs")
    )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| f.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_module_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("x-toggle.ts")).unwrap();
        File::create(dir_path.join("x-toggle.types.d.ts")).unwrap();
        File::create(dir_path.join("x-list.js")).unwrap();
        File::create(dir_path.join("x-list.types.ts")).unwrap();
        File::create(dir_path.join("x-card.mjs")).unwrap();
        File::create(dir_path.join("globals.d.ts")).unwrap();
        File::create(dir_path.join("style.css")).unwrap();

        let result = scan_files(dir_path, &[], &[], false);

        assert_eq!(
            names(&result, dir_path),
            vec!["x-card.mjs", "x-list.js", "x-toggle.ts"]
        );
    }

    #[test]
    fn test_scan_ignores_node_modules() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let node_modules = dir_path.join("node_modules");
        fs::create_dir(&node_modules).unwrap();
        File::create(node_modules.join("lib.ts")).unwrap();
        File::create(dir_path.join("app.ts")).unwrap();

        let result = scan_files(dir_path, &[], &["**/node_modules/**".to_owned()], false);

        assert_eq!(names(&result, dir_path), vec!["app.ts"]);
    }

    #[test]
    fn test_scan_with_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("src/components")).unwrap();
        File::create(dir_path.join("src/components/x-button.ts")).unwrap();
        fs::create_dir(dir_path.join("scripts")).unwrap();
        File::create(dir_path.join("scripts/build.js")).unwrap();

        let result = scan_files(dir_path, &["src".to_owned()], &[], false);

        assert_eq!(names(&result, dir_path), vec!["src/components/x-button.ts"]);
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("src/components")).unwrap();
        File::create(dir_path.join("src/components/x-button.ts")).unwrap();

        let result = scan_files(
            dir_path,
            &["src".to_owned(), "src/components".to_owned()],
            &[],
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("packages/a")).unwrap();
        File::create(dir_path.join("packages/a/x-a.ts")).unwrap();
        fs::create_dir_all(dir_path.join("packages/b")).unwrap();
        File::create(dir_path.join("packages/b/x-b.ts")).unwrap();
        fs::create_dir(dir_path.join("lib")).unwrap();
        File::create(dir_path.join("lib/util.ts")).unwrap();

        let result = scan_files(dir_path, &["packages/*".to_owned()], &[], false);

        assert_eq!(
            names(&result, dir_path),
            vec!["packages/a/x-a.ts", "packages/b/x-b.ts"]
        );
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("x-toggle.ts")).unwrap();
        File::create(dir_path.join("x-toggle.test.ts")).unwrap();
        File::create(dir_path.join("x-toggle.spec.js")).unwrap();
        fs::create_dir(dir_path.join("__tests__")).unwrap();
        File::create(dir_path.join("__tests__/helper.ts")).unwrap();

        let ignored = scan_files(dir_path, &[], &[], true);
        assert_eq!(names(&ignored, dir_path), vec!["x-toggle.ts"]);

        let kept = scan_files(dir_path, &[], &[], false);
        assert_eq!(kept.files.len(), 4);
    }

    #[test]
    fn test_scan_ignores_literal_and_glob_paths() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("src/generated")).unwrap();
        File::create(dir_path.join("src/generated/x-gen.ts")).unwrap();
        File::create(dir_path.join("src/x-button.ts")).unwrap();
        File::create(dir_path.join("src/x-button.stories.ts")).unwrap();

        let result = scan_files(
            dir_path,
            &["src".to_owned()],
            &["src/generated".to_owned(), "**/*.stories.ts".to_owned()],
            false,
        );

        assert_eq!(names(&result, dir_path), vec!["src/x-button.ts"]);
    }

    #[test]
    fn test_scan_with_nonexistent_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir(dir_path.join("src")).unwrap();
        File::create(dir_path.join("src/x-a.ts")).unwrap();

        let result = scan_files(
            dir_path,
            &["src".to_owned(), "missing".to_owned()],
            &[],
            false,
        );
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("src/*"));
        assert!(is_glob_pattern("file?.ts"));
        assert!(!is_glob_pattern("packages/[scope]"));
        assert!(!is_glob_pattern("src/components"));
    }
}
