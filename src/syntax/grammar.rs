//! Grammar selection and parsing.
//!
//! | Grammar | Extensions | Notes |
//! |---------|------------|-------|
//! | `TypeScript` | `.ts`, `.mts`, `.cts`, `.svelte` | allows `<T>value` casts, no JSX |
//! | `Tsx` | everything else | JSX, used for `.js`/`.jsx` too since plain JS never has `<T>` casts |

use std::path::Path;

use tree_sitter::{Parser, Tree};

use crate::error::{OrderError, OrderResult};

/// tree-sitter grammar used to parse a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Grammar {
    /// TypeScript without JSX
    TypeScript,
    /// TypeScript with JSX; parses JavaScript and JSX files as well
    #[default]
    Tsx,
}

impl Grammar {
    /// Pick the grammar from a file name's extension.
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path).extension().and_then(|e| e.to_str());
        match ext {
            Some("ts" | "mts" | "cts" | "svelte") => Self::TypeScript,
            _ => Self::Tsx,
        }
    }

    /// Fresh parser for this grammar.
    pub fn parser(self) -> OrderResult<Parser> {
        let lang = match self {
            Self::TypeScript => &tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            Self::Tsx => &tree_sitter_typescript::LANGUAGE_TSX,
        };
        let mut parser = Parser::new();
        parser
            .set_language(&(*lang).into())
            .map_err(|e| OrderError::TreeSitter(e.to_string()))?;
        Ok(parser)
    }

    /// Parse `source` into a syntax tree. Syntax errors are kept in the tree.
    pub fn parse(self, source: &str) -> OrderResult<Tree> {
        self.parser()?
            .parse(source, None)
            .ok_or_else(|| OrderError::TreeSitter("parser returned no tree".to_string()))
    }
}
