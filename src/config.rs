//! Rule configuration.

use crate::syntax::Grammar;

/// Default maximum number of check/fix passes before giving up.
pub const DEFAULT_MAX_PASSES: usize = 10;

// =============================================================================
// FileVariant
// =============================================================================

/// Source file flavor, decides which statements participate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileVariant {
    /// Every top-level import participates
    #[default]
    Plain,
    /// Component file whose instance and module scripts were combined into one
    /// text. The block being linted is dedented; the other block keeps its
    /// indentation, so only imports on unindented lines participate.
    SvelteCombined,
}

impl FileVariant {
    /// Detect the variant from a file name or path.
    pub fn from_path(path: &str) -> Self {
        if path.contains(".svelte") {
            Self::SvelteCombined
        } else {
            Self::Plain
        }
    }

    /// Whether a statement starting at `offset` takes part in ordering.
    pub fn participates(self, source: &str, offset: usize) -> bool {
        match self {
            Self::Plain => true,
            Self::SvelteCombined => {
                let prefix = source.get(..offset).unwrap_or_default();
                let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
                !source[line_start..].starts_with(' ')
            }
        }
    }
}

// =============================================================================
// OrderConfig
// =============================================================================

/// Configuration for the import-order rule.
///
/// ```
/// use import_order::config::{FileVariant, OrderConfig};
///
/// use import_order::syntax::Grammar;
///
/// let config = OrderConfig::for_path("src/App.svelte").with_max_passes(4);
/// assert_eq!(config.variant, FileVariant::SvelteCombined);
/// assert_eq!(config.grammar, Grammar::TypeScript);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrderConfig {
    /// Reorder import statements within the file.
    /// Default: true
    pub statements: bool,
    /// Reorder named items inside each import statement.
    /// Default: true
    pub specifiers: bool,
    /// File flavor used to filter statements.
    /// Default: `FileVariant::Plain`
    pub variant: FileVariant,
    /// Parser grammar.
    /// Default: `Grammar::Tsx`
    pub grammar: Grammar,
    /// Maximum check/fix passes when fixing a whole file.
    /// Default: 10
    pub max_passes: usize,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            statements: true,
            specifiers: true,
            variant: FileVariant::Plain,
            grammar: Grammar::Tsx,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl OrderConfig {
    /// Default config with the variant and grammar detected from `path`.
    pub fn for_path(path: &str) -> Self {
        Self::default()
            .with_variant(FileVariant::from_path(path))
            .with_grammar(Grammar::from_path(path))
    }

    /// Only reorder statements, leave named items alone.
    pub fn statements_only() -> Self {
        Self {
            specifiers: false,
            ..Default::default()
        }
    }

    /// Only reorder named items inside statements.
    pub fn specifiers_only() -> Self {
        Self {
            statements: false,
            ..Default::default()
        }
    }

    /// Set the file variant.
    pub fn with_variant(mut self, variant: FileVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the parser grammar.
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Set the pass limit (at least one pass always runs).
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }
}
