//! Fix application
//!
//! Host side of the rule: turns violations into text replacements and applies
//! them to the source.
//!
//! # Model
//!
//! ```text
//! Violation ──edits()──► [Remove, Insert] ──merge──► Fix { range, text }
//!
//! pass:  sort fixes by range
//!        apply a fix only if it starts after the previous applied fix ends
//!        defer the rest to the next pass
//!
//! fix_source: check → apply → check → ... until clean or max_passes
//! ```
//!
//! Every fix of a pass is computed against the same source before any is
//! applied, so an error leaves the input untouched.

use crate::algo::EditOperation;
use crate::config::OrderConfig;
use crate::error::{OrderError, OrderResult};
use crate::rule::{ImportOrder, Violation};
use crate::span::TextRange;

// =============================================================================
// Fix
// =============================================================================

/// A single replacement of `range` with `text`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub range: TextRange,
    pub text: String,
}

impl Fix {
    /// Merge the edits of one violation into one replacement covering all of
    /// them. Text between the edits is carried over unchanged.
    pub fn from_edits(source: &str, ops: &[EditOperation]) -> OrderResult<Self> {
        let mut sorted: Vec<&EditOperation> = ops.iter().collect();
        sorted.sort_by_key(|op| {
            let range = op.range();
            (range.start, range.end)
        });

        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return Err(OrderError::invalid_edit("fix without edits"));
        };
        let covered = first.range().cover(last.range());
        let covered = sorted.iter().fold(covered, |acc, op| acc.cover(op.range()));

        let mut text = String::new();
        let mut cursor = covered.start;
        for op in &sorted {
            let range = op.range();
            if range.start < cursor {
                return Err(OrderError::invalid_edit(format!(
                    "overlapping edits at {} within one fix",
                    range
                )));
            }
            text.push_str(checked_slice(source, cursor, range.start)?);
            checked_slice(source, range.start, range.end)?;
            text.push_str(op.text());
            cursor = range.end;
        }

        Ok(Self {
            range: covered,
            text,
        })
    }

    /// Apply this fix alone to `source`.
    pub fn apply(&self, source: &str) -> OrderResult<String> {
        let before = checked_slice(source, 0, self.range.start)?;
        let after = checked_slice(source, self.range.end, source.len())?;
        Ok(format!("{}{}{}", before, self.text, after))
    }
}

// =============================================================================
// One pass
// =============================================================================

/// Result of applying one batch of violations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPass {
    pub output: String,
    pub applied: usize,
    /// Fixes skipped because they overlapped an applied fix
    pub deferred: usize,
}

/// Apply the fixes of `violations` to `source`.
///
/// Fixes are sorted by start offset; a fix whose range starts at or before
/// the end of the last applied fix is deferred.
pub fn apply_fixes(source: &str, violations: &[Violation<'_>]) -> OrderResult<FixPass> {
    let mut fixes = violations
        .iter()
        .map(Violation::fix)
        .collect::<OrderResult<Vec<_>>>()?;
    // Stable: equal ranges keep report order
    fixes.sort_by_key(|fix| (fix.range.start, fix.range.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut last_end: Option<usize> = None;
    let mut applied = 0;
    let mut deferred = 0;

    for fix in &fixes {
        if last_end.is_some_and(|end| fix.range.start <= end) {
            deferred += 1;
            continue;
        }
        output.push_str(checked_slice(source, cursor, fix.range.start)?);
        output.push_str(&fix.text);
        cursor = fix.range.end;
        last_end = Some(fix.range.end);
        applied += 1;
    }
    output.push_str(checked_slice(source, cursor, source.len())?);

    tracing::debug!(applied, deferred, "fix pass");

    Ok(FixPass {
        output,
        applied,
        deferred,
    })
}

// =============================================================================
// Whole file
// =============================================================================

/// Result of fixing a file to a fixed point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    /// Passes that applied at least one fix
    pub passes: usize,
    /// Violations still present in `output`
    pub remaining: usize,
    /// `output` has no violations left
    pub converged: bool,
}

/// Check and fix `source` repeatedly until it is clean or `config.max_passes`
/// passes have run.
///
/// ```
/// use import_order::{fix_source, OrderConfig};
///
/// let outcome = fix_source("import { b, a } from 'm';\n", &OrderConfig::default()).unwrap();
/// assert_eq!(outcome.output, "import { a, b } from 'm';\n");
/// assert!(outcome.converged);
/// ```
pub fn fix_source(source: &str, config: &OrderConfig) -> OrderResult<FixOutcome> {
    let rule = ImportOrder::new(config.clone());
    let max_passes = config.max_passes.max(1);
    let mut output = source.to_string();
    let mut passes = 0;

    loop {
        let (remaining, pass) = {
            let report = rule.check(&output)?;
            let remaining = report.violations.len();
            if remaining == 0 || passes >= max_passes {
                (remaining, None)
            } else {
                (remaining, Some(apply_fixes(&output, &report.violations)?))
            }
        };

        let Some(pass) = pass.filter(|pass| pass.applied > 0) else {
            let converged = remaining == 0;
            if !converged {
                tracing::warn!(passes, remaining, "import order did not converge");
            }
            return Ok(FixOutcome {
                output,
                passes,
                remaining,
                converged,
            });
        };

        passes += 1;
        output = pass.output;
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn checked_slice(source: &str, start: usize, end: usize) -> OrderResult<&str> {
    if start > end {
        return Err(OrderError::invalid_edit(format!("inverted range {}..{}", start, end)));
    }
    source.get(start..end).ok_or_else(|| {
        OrderError::invalid_edit(format!(
            "range {}..{} outside source of {} bytes or not on a char boundary",
            start,
            end,
            source.len()
        ))
    })
}

// =============================================================================
// Tests
// =============================================================================
