pub mod analyze;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use super::args::CommonArgs;
use crate::config::{Config, load_config};
use crate::core::plugin::{AttributePlugin, PluginOptions};

/// Source root, effective config and a plugin built from both.
pub struct CommandContext {
    pub root: PathBuf,
    pub config: Config,
    pub plugin: AttributePlugin,
}

impl CommandContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let root = args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let loaded = load_config(&root)?;
        match &loaded.path {
            Some(path) => debug!(path = %path.display(), "loaded config"),
            None => debug!("no config file found, using defaults"),
        }

        let mut config = loaded.config;
        if args.no_semantic {
            config.semantic = false;
        }

        let plugin = AttributePlugin::new(PluginOptions {
            semantic: config.semantic,
            register_functions: config.register_functions.clone(),
        });

        Ok(Self {
            root,
            config,
            plugin,
        })
    }

    /// Configured manifest path, relative to the source root.
    pub fn default_out_file(&self) -> PathBuf {
        let out_file = Path::new(&self.config.out_file);
        if out_file.is_absolute() {
            out_file.to_path_buf()
        } else {
            self.root.join(out_file)
        }
    }
}
