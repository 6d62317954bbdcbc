//! Prelude module for common imports.
//!
//! ```
//! use import_order::prelude::*;
//!
//! let report = ImportOrder::new(OrderConfig::default()).check("import 'a';").unwrap();
//! assert!(report.is_clean());
//! ```

// Rule
pub use crate::rule::{
    check_batch, FileSummary, ImportOrder, Report, ReportStats, RuleMeta, SourceFile, Violation,
    ViolationKind,
};

// Fixing
pub use crate::fix::{apply_fixes, fix_source, Fix, FixOutcome, FixPass};

// Configuration
pub use crate::config::{FileVariant, OrderConfig, DEFAULT_MAX_PASSES};

// Classification
pub use crate::classify::{
    canonical_specifier_order, canonical_statement_order, Bucket, ImportKind, SortKey,
    StatementKey,
};

// Algorithms
pub use crate::algo::{
    build_edits, diff, plan_moves, Anchor, EditOperation, EditOps, ListLayout, MovePlan,
    MovedElement, SequenceDiff,
};

// Syntax
pub use crate::syntax::{scan_imports, Grammar, ImportDecl, Specifier, SpecifierKind};

// Identity and ranges
pub use crate::id::ElementId;
pub use crate::span::TextRange;

// Error
pub use crate::error::{OrderError, OrderResult};
