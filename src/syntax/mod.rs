//! Source scanning for import declarations.
//!
//! - `grammar`: tree-sitter TypeScript/TSX grammar selection and parsing
//! - `imports`: top-level `import` declarations read from the syntax tree

mod grammar;
mod imports;

pub use grammar::Grammar;
pub use imports::{scan_imports, string_value, ImportDecl, Specifier, SpecifierKind};
