use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::registration::DEFAULT_REGISTER_FUNCTIONS;

pub const CONFIG_FILE_NAME: &str = ".tagmetarc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default = "default_register_functions")]
    pub register_functions: Vec<String>,
    /// Resolve config types through imports and aliases before falling back
    /// to the raw declaration text.
    #[serde(default = "default_semantic")]
    pub semantic: bool,
    #[serde(default = "default_out_file")]
    pub out_file: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/dist/**"].map(String::from).to_vec()
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_register_functions() -> Vec<String> {
    DEFAULT_REGISTER_FUNCTIONS.map(String::from).to_vec()
}

fn default_semantic() -> bool {
    true
}

fn default_out_file() -> String {
    "custom-elements.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            ignore_test_files: default_ignore_test_files(),
            register_functions: default_register_functions(),
            semantic: default_semantic(),
            out_file: default_out_file(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` or `includes` are invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.register_functions.iter().any(|f| f.trim().is_empty()) {
            anyhow::bail!("'registerFunctions' must not contain empty names");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config was loaded from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.includes, vec!["src"]);
        assert_eq!(config.ignores, vec!["**/node_modules/**", "**/dist/**"]);
        assert!(config.ignore_test_files);
        assert!(config.semantic);
        assert_eq!(config.out_file, "custom-elements.json");
        assert_eq!(
            config.register_functions,
            vec![
                "customElements.define",
                "window.customElements.define",
                "defineElement"
            ]
        );
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignores": ["**/dist/**"],
              "includes": ["packages/*/src"],
              "registerFunctions": ["register"],
              "semantic": false,
              "outFile": "dist/manifest.json"
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, vec!["packages/*/src"]);
        assert_eq!(config.register_functions, vec!["register"]);
        assert!(!config.semantic);
        assert_eq!(config.out_file, "dist/manifest.json");
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "semantic": false }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert!(!config.semantic);
        assert_eq!(config.includes, default_includes());
        assert_eq!(config.register_functions, default_register_functions());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let found = find_config_file(dir.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "ignores": ["**/stories/**"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file());
        assert_eq!(result.path, Some(config_path));
        assert_eq!(result.config.ignores, vec!["**/stories/**"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.config.includes, default_includes());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_include_pattern() {
        let config = Config {
            includes: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("includes"));
    }

    #[test]
    fn test_validate_literal_bracket_include() {
        let config = Config {
            includes: vec!["packages/[scope]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_register_function() {
        let config = Config {
            register_functions: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["[invalid"] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("registerFunctions"));
        assert!(json.contains("outFile"));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.includes, default_includes());
    }
}
