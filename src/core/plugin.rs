//! Plugin driver: one registration in, attributes merged into the module
//! document out.
//!
//! Extraction attempts run as an explicit decision table. Each row yields an
//! [`ExtractOutcome`]; `Found` is accepted, `Empty` and `Failed` move on to the
//! next row:
//!
//! | row | strategy  | type name                                   |
//! |-----|-----------|---------------------------------------------|
//! | 1.. | semantic  | each candidate (when enabled)               |
//! | ..  | semantic  | first exported `*ConfigType` (when enabled) |
//! | ..  | syntactic | each candidate                              |
//! | last| syntactic | first exported `*ConfigType`                |
//!
//! When every row comes back without properties nothing is merged and the
//! outcome carries [`Provenance::None`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::core::cache::CompilationCache;
use crate::core::locate::{locate_companion, module_base_name};
use crate::core::manifest::{Attribute, ModuleDocument};
use crate::core::mapper::map_shapes;
use crate::core::naming::{CONFIG_TYPE_SUFFIX, default_config_type_name};
use crate::core::registration::{DEFAULT_REGISTER_FUNCTIONS, Registration, find_registrations};
use crate::core::registry::{merge_attributes, upsert_declaration};
use crate::core::semantic::{extract_semantic, first_config_type};
use crate::core::shape::{ExtractOutcome, TypeShape};
use crate::core::syntactic::extract_syntactic_file;

#[derive(Debug, Clone)]
pub struct PluginOptions {
    /// Try the semantic extractor before the syntactic one.
    pub semantic: bool,
    /// Callee names recognized as element registrations.
    pub register_functions: Vec<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            semantic: true,
            register_functions: DEFAULT_REGISTER_FUNCTIONS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

/// Which extraction produced a declaration's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Semantic { type_name: String },
    /// `type_name` is `None` when the unnamed `*ConfigType` lookup matched.
    Syntactic { type_name: Option<String> },
    /// Every attempt came back empty or failed.
    None,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Semantic { type_name } => write!(f, "semantic ({type_name})"),
            Provenance::Syntactic {
                type_name: Some(type_name),
            } => write!(f, "syntactic ({type_name})"),
            Provenance::Syntactic { type_name: None } => {
                write!(f, "syntactic (first exported *{CONFIG_TYPE_SUFFIX})")
            }
            Provenance::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoCompanion,
    UnreadableCompanion(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOutcome {
    Merged {
        tag_name: String,
        companion: PathBuf,
        provenance: Provenance,
        /// Attributes appended to the declaration by this call.
        added: usize,
    },
    Skipped {
        tag_name: String,
        reason: SkipReason,
    },
}

impl PluginOutcome {
    pub fn tag_name(&self) -> &str {
        match self {
            PluginOutcome::Merged { tag_name, .. } | PluginOutcome::Skipped { tag_name, .. } => {
                tag_name
            }
        }
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        match self {
            PluginOutcome::Merged { provenance, .. } => Some(provenance),
            PluginOutcome::Skipped { .. } => None,
        }
    }
}

/// Attributes extracted from a single companion file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub types_file: PathBuf,
    pub candidates: Vec<String>,
    pub provenance: Provenance,
    pub attributes: Vec<Attribute>,
}

/// Attribute extraction engine with its own compilation cache.
pub struct AttributePlugin {
    options: PluginOptions,
    cache: Arc<CompilationCache>,
}

impl AttributePlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self::with_cache(options, Arc::new(CompilationCache::new()))
    }

    /// Share `cache` with other plugin instances.
    pub fn with_cache(options: PluginOptions, cache: Arc<CompilationCache>) -> Self {
        Self { options, cache }
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<CompilationCache> {
        &self.cache
    }

    /// Analyze every registration in `source`, updating `doc`.
    ///
    /// Fails only when the module itself does not parse.
    pub fn analyze_module(
        &self,
        module_path: &Path,
        source: &str,
        doc: &mut ModuleDocument,
    ) -> Result<Vec<PluginOutcome>> {
        let registrations =
            find_registrations(source, module_path, &self.options.register_functions)?;

        Ok(registrations
            .iter()
            .map(|registration| self.analyze_registration(module_path, registration, doc))
            .collect())
    }

    /// Register the declaration and merge the attributes of its companion
    /// configuration type.
    pub fn analyze_registration(
        &self,
        module_path: &Path,
        registration: &Registration,
        doc: &mut ModuleDocument,
    ) -> PluginOutcome {
        let tag_name = registration.tag_name.clone();
        upsert_declaration(doc, registration);

        let Some(companion) = locate_companion(module_path) else {
            debug!(module = %module_path.display(), tag = %tag_name, "no companion types file");
            return PluginOutcome::Skipped {
                tag_name,
                reason: SkipReason::NoCompanion,
            };
        };

        let source = match fs::read_to_string(&companion) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %companion.display(), error = %err, "cannot read companion types file");
                return PluginOutcome::Skipped {
                    tag_name,
                    reason: SkipReason::UnreadableCompanion(companion),
                };
            }
        };

        let candidates = candidate_type_names(
            registration.class_name.as_deref(),
            module_base_name(module_path).as_deref(),
        );
        let (provenance, shapes) = self.extract(&companion, &source, &candidates);

        let added = if shapes.is_empty() {
            0
        } else {
            merge_attributes(
                doc,
                registration.class_name.as_deref(),
                Some(&registration.tag_name),
                map_shapes(&shapes),
            )
        };
        debug!(tag = %tag_name, %provenance, added, "attributes merged");

        PluginOutcome::Merged {
            tag_name,
            companion,
            provenance,
            added,
        }
    }

    /// Extract attributes from a companion file without a module.
    ///
    /// Without `type_name` the conventional name derived from the file name is
    /// tried first.
    pub fn inspect(&self, types_file: &Path, type_name: Option<&str>) -> Result<Inspection> {
        if !types_file.is_file() {
            bail!("Types file not found: {}", types_file.display());
        }
        let source = fs::read_to_string(types_file)
            .with_context(|| format!("Failed to read {}", types_file.display()))?;

        let candidates = match type_name {
            Some(name) => vec![name.to_string()],
            None => companion_base_name(types_file)
                .map(|base| vec![default_config_type_name(&base)])
                .unwrap_or_default(),
        };
        let (provenance, shapes) = self.extract(types_file, &source, &candidates);

        Ok(Inspection {
            types_file: types_file.to_path_buf(),
            candidates,
            provenance,
            attributes: map_shapes(&shapes),
        })
    }

    fn extract(
        &self,
        companion: &Path,
        source: &str,
        candidates: &[String],
    ) -> (Provenance, Vec<TypeShape>) {
        if self.options.semantic {
            match self.cache.get_or_build(companion, source) {
                Ok(context) => {
                    for name in candidates {
                        match extract_semantic(&context, Some(name)) {
                            ExtractOutcome::Found(shapes) => {
                                let provenance = Provenance::Semantic {
                                    type_name: name.clone(),
                                };
                                return (provenance, shapes);
                            }
                            ExtractOutcome::Empty => {
                                debug!(type_name = %name, "semantic extraction found nothing");
                            }
                            ExtractOutcome::Failed(err) => {
                                debug!(type_name = %name, error = %err, "semantic extraction failed");
                            }
                        }
                    }
                    if let Some((type_name, shapes)) = first_config_type(&context) {
                        return (Provenance::Semantic { type_name }, shapes);
                    }
                    debug!(path = %companion.display(), "no exported config type resolved semantically");
                }
                Err(err) => {
                    debug!(path = %companion.display(), error = %err, "semantic context unavailable, falling back");
                }
            }
        }

        let names = candidates
            .iter()
            .map(|name| Some(name.as_str()))
            .chain(std::iter::once(None));
        for name in names {
            match extract_syntactic_file(companion, source, name) {
                ExtractOutcome::Found(shapes) => {
                    let provenance = Provenance::Syntactic {
                        type_name: name.map(str::to_string),
                    };
                    return (provenance, shapes);
                }
                ExtractOutcome::Empty => {
                    debug!(type_name = ?name, "syntactic extraction found nothing");
                }
                ExtractOutcome::Failed(err) => {
                    debug!(type_name = ?name, error = %err, "syntactic extraction failed");
                }
            }
        }

        (Provenance::None, Vec::new())
    }
}

/// Configuration type names to look up, most specific first.
pub fn candidate_type_names(class_name: Option<&str>, module_base: Option<&str>) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(class_name) = class_name {
        names.push(format!("{class_name}{CONFIG_TYPE_SUFFIX}"));
    }
    if let Some(base) = module_base {
        let name = default_config_type_name(base);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// `x-toggle` for `x-toggle.types.d.ts` and `x-toggle.types.ts`.
fn companion_base_name(types_file: &Path) -> Option<String> {
    let file_name = types_file.file_name()?.to_string_lossy();
    [".types.d.ts", ".types.ts", ".d.ts", ".ts"]
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .filter(|base| !base.is_empty())
        .map(str::to_string)
}
