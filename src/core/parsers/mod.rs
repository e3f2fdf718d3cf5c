//! Source parsers.
//!
//! - `ts`: TypeScript / TSX parser (uses swc for AST generation)
//! - `doc`: JSDoc comment cleanup

pub mod doc;
pub mod ts;
