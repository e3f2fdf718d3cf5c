//! Semantic extraction backed by a resolution context.
//!
//! Unlike the syntactic extractor, member types are expanded through aliases,
//! generics and imports, and intersection branches that name another type are
//! resolved and enumerated in full.
//!
//! ## Module Structure
//!
//! - `program`: builds the [`TypeProgram`] (companion file + linked files)
//! - `resolve`: property enumeration and type-text expansion

pub mod program;
pub mod resolve;

use std::path::{Path, PathBuf};

pub use program::{FileId, ROOT_FILE, TypeProgram};
pub use resolve::Resolver;

use crate::core::naming::CONFIG_TYPE_SUFFIX;
use crate::core::shape::{ExtractError, ExtractOutcome, TypeShape};

/// Resolution state for one companion file, as cached by `CompilationCache`.
pub struct CompilationContext {
    pub file_path: PathBuf,
    /// The text the context was built from.
    pub source_text: String,
    program: TypeProgram,
}

impl CompilationContext {
    /// Build the resolution context for `file_path` from its current text.
    ///
    /// Fails with [`ExtractError::NotFound`] when the file no longer exists and
    /// with [`ExtractError::Parse`] when `source_text` does not parse.
    pub fn build(file_path: &Path, source_text: &str) -> Result<Self, ExtractError> {
        if !file_path.is_file() {
            return Err(ExtractError::NotFound(file_path.to_path_buf()));
        }
        let program = TypeProgram::build(file_path, source_text)?;

        Ok(Self {
            file_path: file_path.to_path_buf(),
            source_text: source_text.to_string(),
            program,
        })
    }

    pub fn program(&self) -> &TypeProgram {
        &self.program
    }
}

impl std::fmt::Debug for CompilationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationContext")
            .field("file_path", &self.file_path)
            .field("files", &self.program.file_count())
            .finish()
    }
}

/// Extract the fully resolved properties of `type_name` (or of the first
/// exported `*ConfigType` of the companion file that has any).
pub fn extract_semantic(context: &CompilationContext, type_name: Option<&str>) -> ExtractOutcome {
    let shapes = match type_name {
        Some(name) => {
            let program = context.program();
            match program.find_type(ROOT_FILE, name) {
                Some(symbol) => Resolver::new(program).symbol_properties(symbol),
                None => Vec::new(),
            }
        }
        None => first_config_type(context)
            .map(|(_, shapes)| shapes)
            .unwrap_or_default(),
    };

    ExtractOutcome::from_shapes(shapes)
}

/// The first exported `*ConfigType` of the companion file with any resolved
/// properties, together with its name.
pub fn first_config_type(context: &CompilationContext) -> Option<(String, Vec<TypeShape>)> {
    let program = context.program();
    let mut resolver = Resolver::new(program);

    program
        .file(ROOT_FILE)
        .declared_names()
        .filter(|(name, exported)| *exported && name.ends_with(CONFIG_TYPE_SUFFIX))
        .filter_map(|(name, _)| Some((name, program.lookup(ROOT_FILE, name)?)))
        .map(|(name, symbol)| (name.to_string(), resolver.symbol_properties(symbol)))
        .find(|(_, shapes)| !shapes.is_empty())
}
