//! Import order rule
//!
//! Drives the reordering pipeline over one source file at both nesting
//! levels and reports one violation per moved element.
//!
//! # Pipeline
//!
//! ```text
//! source ──► scan_imports ──► filter (FileVariant)
//!                                   │
//!            ┌──────────────────────┴──────────────────────┐
//!            ▼                                             ▼
//!   per statement: named items                  all statements
//!   canonical_specifier_order                   canonical_statement_order
//!            │                                             │
//!            ▼                                             ▼
//!      diff + plan_moves                             diff + plan_moves
//!            │                                             │
//!            └────────────► Violation (lazy edits) ◄───────┘
//! ```
//!
//! The two levels are independent: a statement may be reported both for its
//! own item order and for its position among sibling statements.
//!
//! # Example
//!
//! ```
//! use import_order::{ImportOrder, OrderConfig};
//!
//! let rule = ImportOrder::new(OrderConfig::default());
//! let report = rule.check("import { zeta, alpha, beta } from 'm';\n").unwrap();
//! assert_eq!(report.violations.len(), 1);
//! assert_eq!(report.violations[0].message, ImportOrder::SPECIFIERS_MESSAGE);
//! ```

use std::sync::Arc;

use compact_str::CompactString;

use crate::algo::{diff, edits_for_move, plan_moves, EditOps, ListLayout, MovePlan};
use crate::classify::{canonical_specifier_order, canonical_statement_order, SortKey};
use crate::config::{FileVariant, OrderConfig};
use crate::error::{OrderError, OrderResult};
use crate::fix::Fix;
use crate::id::ElementId;
use crate::span::TextRange;
use crate::syntax::{scan_imports, ImportDecl};

// =============================================================================
// Public Types
// =============================================================================

/// Static description of the rule for hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    pub name: &'static str,
    /// Violations carry automatic fixes
    pub fixable: bool,
}

/// Which list a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// An import statement among its siblings
    Statement,
    /// A named item inside one statement's braces
    Specifier,
}

/// Element ranges and delimiter layout of one analyzed list, shared by every
/// violation reported against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListContext {
    /// Source range of each element, indexed by `ElementId`
    pub ranges: Vec<TextRange>,
    pub layout: ListLayout,
}

/// One moved element.
///
/// Edits are not computed until [`Violation::edits`] or [`Violation::fix`] is
/// called, so hosts that only report pay for the diff alone.
#[derive(Debug, Clone)]
pub struct Violation<'s> {
    pub kind: ViolationKind,
    /// Range of the moved element in the analyzed source
    pub range: TextRange,
    pub message: &'static str,
    pub plan: MovePlan,
    list: Arc<ListContext>,
    source: &'s str,
}

impl<'s> Violation<'s> {
    /// Remove + insert edits for this element against the analyzed source.
    pub fn edits(&self) -> OrderResult<EditOps> {
        edits_for_move(&self.plan, &self.list.ranges, &self.list.layout, self.source)
    }

    /// Edits merged into a single replacement.
    pub fn fix(&self) -> OrderResult<Fix> {
        Fix::from_edits(self.source, &self.edits()?)
    }

    pub fn source(&self) -> &'s str {
        self.source
    }
}

/// Counters for one analyzed file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Statements that took part in ordering
    pub statements: usize,
    /// Statements whose named items were analyzed
    pub specifier_lists: usize,
    pub moved_statements: usize,
    pub moved_specifiers: usize,
}

/// Violations for one file, specifier violations first (by statement), then
/// statement violations, each ascending by target position.
#[derive(Debug, Clone, Default)]
pub struct Report<'s> {
    pub violations: Vec<Violation<'s>>,
    pub stats: ReportStats,
}

impl Report<'_> {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// Rule
// =============================================================================

/// The import ordering rule
#[derive(Debug, Clone, Default)]
pub struct ImportOrder {
    config: OrderConfig,
}

impl ImportOrder {
    pub const NAME: &'static str = "import-order";

    /// Every violation this rule reports can be fixed automatically.
    pub const FIXABLE: bool = true;

    pub const STATEMENTS_MESSAGE: &'static str = "Import declarations should be sorted.";
    pub const SPECIFIERS_MESSAGE: &'static str = "Import specifiers should be sorted.";

    pub fn new(config: OrderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrderConfig {
        &self.config
    }

    pub const fn meta() -> RuleMeta {
        RuleMeta {
            name: Self::NAME,
            fixable: Self::FIXABLE,
        }
    }

    /// Scan `source` and report every out-of-place import and named item.
    pub fn check<'s>(&self, source: &'s str) -> OrderResult<Report<'s>> {
        let imports = scan_imports(source, self.config.grammar)?;
        self.check_imports(source, &imports)
    }

    /// Report against already scanned declarations.
    ///
    /// `imports` must be in source order and their ranges must point into
    /// `source`.
    pub fn check_imports<'s>(
        &self,
        source: &'s str,
        imports: &[ImportDecl],
    ) -> OrderResult<Report<'s>> {
        let statements: Vec<&ImportDecl> = imports
            .iter()
            .filter(|decl| self.config.variant.participates(source, decl.range.start))
            .collect();

        let mut report = Report {
            violations: Vec::new(),
            stats: ReportStats {
                statements: statements.len(),
                ..Default::default()
            },
        };

        if statements.is_empty() {
            return Ok(report);
        }

        if self.config.specifiers {
            for decl in &statements {
                let moved = self.check_specifiers(source, decl, &mut report.violations)?;
                if let Some(moved) = moved {
                    report.stats.specifier_lists += 1;
                    report.stats.moved_specifiers += moved;
                }
            }
        }

        if self.config.statements {
            report.stats.moved_statements =
                self.check_statements(source, &statements, &mut report.violations)?;
        }

        tracing::debug!(
            statements = report.stats.statements,
            moved_statements = report.stats.moved_statements,
            moved_specifiers = report.stats.moved_specifiers,
            "import order checked"
        );

        Ok(report)
    }

    /// Named items of one statement. Returns `None` when the statement has no
    /// list worth analyzing, otherwise the number of moved items.
    fn check_specifiers<'s>(
        &self,
        source: &'s str,
        decl: &ImportDecl,
        out: &mut Vec<Violation<'s>>,
    ) -> OrderResult<Option<usize>> {
        let named: Vec<_> = decl.named_specifiers().collect();
        if named.len() < 2 {
            return Ok(None);
        }

        let keys: Vec<SortKey> = named.iter().map(|s| SortKey::folded(&s.imported)).collect();
        let original = ElementId::sequence(named.len());
        let target = canonical_specifier_order(&keys);

        let (open, close) = decl
            .braces
            .ok_or_else(|| OrderError::missing_delimiter("{", decl.range.start))?;
        let list = ListContext {
            ranges: named.iter().map(|s| s.range).collect(),
            layout: ListLayout::Delimited {
                open,
                close,
                commas: decl.commas.clone(),
            },
        };

        report_moves(
            source,
            ViolationKind::Specifier,
            Self::SPECIFIERS_MESSAGE,
            &original,
            &target,
            list,
            out,
        )
        .map(Some)
    }

    fn check_statements<'s>(
        &self,
        source: &'s str,
        statements: &[&ImportDecl],
        out: &mut Vec<Violation<'s>>,
    ) -> OrderResult<usize> {
        let keys: Vec<_> = statements.iter().map(|decl| decl.statement_key()).collect();
        let original = ElementId::sequence(statements.len());
        let target = canonical_statement_order(&keys);

        // Non-empty: checked by the caller
        let block_start = statements[0].range.start;
        let list = ListContext {
            ranges: statements.iter().map(|decl| decl.range).collect(),
            layout: ListLayout::Lines { block_start },
        };

        report_moves(
            source,
            ViolationKind::Statement,
            Self::STATEMENTS_MESSAGE,
            &original,
            &target,
            list,
            out,
        )
    }
}

/// Diff one list and push a violation per moved element. Returns the number
/// of moved elements.
fn report_moves<'s>(
    source: &'s str,
    kind: ViolationKind,
    message: &'static str,
    original: &[ElementId],
    target: &[ElementId],
    list: ListContext,
    out: &mut Vec<Violation<'s>>,
) -> OrderResult<usize> {
    let diff = diff(original, target)?;
    if !diff.has_changes() {
        return Ok(0);
    }

    let plans = plan_moves(&diff)?;
    tracing::debug!(?kind, distance = diff.distance(), moved = plans.len(), "out of order");

    let list = Arc::new(list);
    for plan in &plans {
        let range = list
            .ranges
            .get(plan.id.index())
            .copied()
            .ok_or_else(|| OrderError::invalid_edit(format!("unknown element {}", plan.id)))?;
        out.push(Violation {
            kind,
            range,
            message,
            plan: *plan,
            list: Arc::clone(&list),
            source,
        });
    }

    Ok(plans.len())
}

// =============================================================================
// Batch analysis
// =============================================================================

/// One file of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name or path, used to detect the file variant
    pub name: CompactString,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<CompactString>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Violation summary of one file in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: CompactString,
    pub stats: ReportStats,
    /// `(kind, range)` of each violation, in report order
    pub violations: Vec<(ViolationKind, TextRange)>,
}

/// Check many files. Each file gets its own `Result`; one failing file never
/// affects the others. The variant is detected per file from its name,
/// overriding `config.variant`.
///
/// With the `parallel` feature files are checked on the rayon pool; results
/// keep input order either way.
pub fn check_batch(config: &OrderConfig, files: &[SourceFile]) -> Vec<OrderResult<FileSummary>> {
    let check_one = |file: &SourceFile| -> OrderResult<FileSummary> {
        let rule = ImportOrder::new(config.clone().with_variant(FileVariant::from_path(&file.name)));
        let report = rule.check(&file.text)?;
        Ok(FileSummary {
            name: file.name.clone(),
            stats: report.stats,
            violations: report.violations.iter().map(|v| (v.kind, v.range)).collect(),
        })
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        files.par_iter().map(check_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        files.iter().map(check_one).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
