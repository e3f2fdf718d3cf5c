//! Syntactic extraction: walks a single companion file without resolving
//! cross-references.
//!
//! Fast and dependency-free, but intersection branches that name another type
//! are left out. The semantic extractor covers those.

use std::path::Path;

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::TsTypeElement;

use crate::core::decls::{
    TopLevelDecl, TypeDecl, TypeNode, classify, documented_properties, property_name,
    top_level_decls,
};
use crate::core::naming::CONFIG_TYPE_SUFFIX;
use crate::core::parsers::ts::{ParsedSource, SourceKind, parse_typescript_source};
use crate::core::shape::{ExtractError, ExtractOutcome, TypeShape, push_unique};

/// File name used when extracting from text that has no path of its own.
const ANONYMOUS_SOURCE: &str = "anonymous.types.ts";

/// Extract the properties of `type_name` (or of the first exported
/// `*ConfigType` with members) from TypeScript source text.
pub fn extract_syntactic(source_text: &str, type_name: Option<&str>) -> ExtractOutcome {
    extract_syntactic_file(Path::new(ANONYMOUS_SOURCE), source_text, type_name)
}

/// Same as [`extract_syntactic`], parsing `source_text` in the mode implied by
/// `path` (`.d.ts` files allow declaration-only syntax).
pub fn extract_syntactic_file(
    path: &Path,
    source_text: &str,
    type_name: Option<&str>,
) -> ExtractOutcome {
    let parsed = match parse_typescript_source(
        source_text.to_string(),
        &path.to_string_lossy(),
        SourceKind::from_path(path),
    ) {
        Ok(parsed) => parsed,
        Err(err) => {
            return ExtractOutcome::Failed(ExtractError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    let decls = top_level_decls(&parsed.module);

    let shapes = match type_name {
        Some(name) => decls
            .iter()
            .find(|decl| decl.name() == name)
            .map(|decl| declaration_shapes(&parsed, decl))
            .unwrap_or_default(),
        None => decls
            .iter()
            .filter(|decl| decl.exported && decl.name().ends_with(CONFIG_TYPE_SUFFIX))
            .map(|decl| declaration_shapes(&parsed, decl))
            .find(|shapes| !shapes.is_empty())
            .unwrap_or_default(),
    };

    ExtractOutcome::from_shapes(shapes)
}

fn declaration_shapes(parsed: &ParsedSource, decl: &TopLevelDecl) -> Vec<TypeShape> {
    let mut shapes = Vec::new();

    match decl.decl {
        TypeDecl::Interface(iface) => {
            collect_members(parsed, &iface.body.body, iface.body.span.lo, &mut shapes)
        }
        TypeDecl::Alias(alias) => match classify(&alias.type_ann) {
            TypeNode::Object(lit) => collect_members(parsed, &lit.members, lit.span.lo, &mut shapes),
            TypeNode::Intersection(branches) => {
                for branch in branches {
                    // Named branches need type resolution; skip them here.
                    if let TypeNode::Object(lit) = classify(branch) {
                        collect_members(parsed, &lit.members, lit.span.lo, &mut shapes);
                    }
                }
            }
            _ => {}
        },
    }

    shapes
}

fn collect_members(
    parsed: &ParsedSource,
    members: &[TsTypeElement],
    body_start: BytePos,
    shapes: &mut Vec<TypeShape>,
) {
    for (prop, doc_start) in documented_properties(members, body_start) {
        let Some(name) = property_name(prop) else {
            continue;
        };

        let type_text = prop
            .type_ann
            .as_ref()
            .and_then(|ann| parsed.snippet(ann.type_ann.span()))
            .unwrap_or_else(|| "any".to_string());

        push_unique(
            shapes,
            TypeShape {
                name,
                type_text,
                optional: prop.optional,
                doc: parsed.comments.doc_between(doc_start, prop.span.lo),
            },
        );
    }
}
