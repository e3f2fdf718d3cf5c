//! Common output contract of both extraction strategies.
//!
//! Extraction never throws past its own boundary. Each call returns an
//! [`ExtractOutcome`] and the plugin driver decides what to try next.

use std::path::PathBuf;

use thiserror::Error;

/// One property of a configuration type, before attribute mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    /// Property name as written in the type. Never empty.
    pub name: String,
    /// Type text: a raw source slice (syntactic) or resolved form (semantic).
    pub type_text: String,
    pub optional: bool,
    pub doc: Option<String>,
}

/// Why an extraction produced nothing usable.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Result of one extraction attempt.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// At least one property was found.
    Found(Vec<TypeShape>),
    /// The source was readable but no matching type (or no members) was found.
    Empty,
    /// The strategy could not run on this input.
    Failed(ExtractError),
}

impl ExtractOutcome {
    /// Wrap a list of shapes, collapsing an empty list to `Empty`.
    pub fn from_shapes(shapes: Vec<TypeShape>) -> Self {
        if shapes.is_empty() {
            ExtractOutcome::Empty
        } else {
            ExtractOutcome::Found(shapes)
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ExtractOutcome::Found(_))
    }

    /// The found shapes, or an empty list for `Empty` and `Failed`.
    pub fn into_shapes(self) -> Vec<TypeShape> {
        match self {
            ExtractOutcome::Found(shapes) => shapes,
            ExtractOutcome::Empty | ExtractOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Append `shape` unless a shape with the same name is already present.
pub(crate) fn push_unique(shapes: &mut Vec<TypeShape>, shape: TypeShape) {
    if !shapes.iter().any(|existing| existing.name == shape.name) {
        shapes.push(shape);
    }
}
