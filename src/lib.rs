//! import-order - Canonical import ordering with minimal text edits
//!
//! ## Core Concepts
//!
//! **Identity-based diff**: elements are identified by occurrence, not by
//! content. The canonical order is aligned with the source order through a
//! longest common subsequence; only elements off that subsequence move.
//!
//! **Anchored edits**: every moved element becomes one violation with a
//! remove/insert pair anchored to the nearest preceding unchanged element.
//!
//! ## Modules
//! - `classify`: buckets and sort keys, canonical order
//! - `collate`: case-insensitive locale-style string comparison
//! - `algo`: Myers LCS, sequence diff, edit script builder
//! - `rule`: two-level orchestration and violations
//! - `fix`: merging and applying fixes, fixed-point loop
//! - `syntax`: tree-sitter import declaration scanner
//! - `config`: rule configuration and file variants
//!
//! ## Usage
//!
//! ```
//! use import_order::{fix_source, ImportOrder, OrderConfig};
//!
//! let source = "import { b, a } from 'mod';\nimport c from 'x';\n";
//!
//! let report = ImportOrder::default().check(source).unwrap();
//! assert_eq!(report.violations.len(), 2);
//!
//! let fixed = fix_source(source, &OrderConfig::default()).unwrap();
//! assert_eq!(fixed.output, "import c from 'x';\nimport { a, b } from 'mod';\n");
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Canonical ordering: buckets, keys, stable sort
pub mod classify;

/// String collation
pub mod collate;

/// Algorithms: myers, diff, edits
pub mod algo;

/// Rule orchestration and violations
pub mod rule;

/// Fix merging and application
pub mod fix;

// =============================================================================
// Host adapter
// =============================================================================

/// Import declaration scanner
pub mod syntax;

/// Rule configuration
pub mod config;

// =============================================================================
// Support
// =============================================================================

/// Occurrence identity
pub mod id;

/// Byte ranges
pub mod span;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Rule
pub use rule::{check_batch, ImportOrder, Report, RuleMeta, SourceFile, Violation, ViolationKind};

// Fixing
pub use fix::{apply_fixes, fix_source, Fix, FixOutcome, FixPass};

// Configuration
pub use config::{FileVariant, OrderConfig};
pub use syntax::Grammar;

// Algorithms
pub use algo::{diff, Anchor, EditOperation, SequenceDiff};

// Identity and ranges
pub use id::ElementId;
pub use span::TextRange;

// Error types
pub use error::{OrderError, OrderResult};
