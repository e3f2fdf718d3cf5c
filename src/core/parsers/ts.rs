use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap, SourceMapper, Span,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use super::doc::doc_text;

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments copied out of the parser's `SingleThreadedComments`, so a
/// parsed file can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Text of the last JSDoc block lying entirely within `start..end`.
    ///
    /// swc files a block that shares a line with the preceding token as a
    /// trailing comment of that token, so both maps are searched.
    pub fn doc_between(&self, start: BytePos, end: BytePos) -> Option<String> {
        self.leading
            .values()
            .chain(self.trailing.values())
            .flatten()
            .filter(|cmt| cmt.span.lo >= start && cmt.span.hi <= end)
            .filter_map(|cmt| Some((cmt.span.lo, doc_text(cmt)?)))
            .max_by_key(|(lo, _)| *lo)
            .map(|(_, text)| text)
    }
}

/// How a source file should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Declaration-only file (`.d.ts`).
    Declaration,
    /// Plain TypeScript (`.ts`, `.mts`, `.cts`).
    TypeScript,
    /// TSX / JSX or JavaScript module source.
    Tsx,
}

impl SourceKind {
    /// Pick the parse mode from a file name.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
            SourceKind::Declaration
        } else if name.ends_with(".ts") || name.ends_with(".mts") || name.ends_with(".cts") {
            SourceKind::TypeScript
        } else {
            SourceKind::Tsx
        }
    }

    fn syntax(self) -> Syntax {
        Syntax::Typescript(TsSyntax {
            tsx: self == SourceKind::Tsx,
            dts: self == SourceKind::Declaration,
            ..Default::default()
        })
    }
}

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
}

impl ParsedSource {
    /// Raw source text covered by `span`.
    pub fn snippet(&self, span: Span) -> Option<String> {
        self.source_map.span_to_snippet(span).ok()
    }
}

/// Parse TypeScript source code string into an AST.
///
/// Each call gets its own SourceMap so parsed files can be cached and shared
/// across threads independently of one another.
pub fn parse_typescript_source(code: String, file_path: &str, kind: SourceKind) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Arc::default();

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(kind.syntax(), StringInput::from(&*source_file), Some(&comments));

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            comments: extracted_comments,
        })
    })
}
