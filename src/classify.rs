//! Canonical Ordering Classifier
//!
//! Computes the target order of a sequence from each element's own
//! attributes. The result does not depend on the input order except for
//! elements with equal keys, which keep their relative order (stable sort).
//!
//! # Statement level
//!
//! ```text
//! import type ...        ┐ ImportKind::Type
//!   side-effect          │   Bucket::SideEffect   by source
//!   namespace            │   Bucket::Namespace    by local name
//!   default              │   Bucket::Default      by local name
//!   named-only           ┘   Bucket::Named        by source
//! import ...             ┐ ImportKind::Value
//!   (same buckets)       ┘
//! ```
//!
//! # Specifier level
//!
//! One bucket; items sorted by imported name.

use std::cmp::Ordering;

use compact_str::CompactString;

use crate::collate::locale_cmp;
use crate::id::ElementId;

// =============================================================================
// Classification
// =============================================================================

/// Outer partition: type-only imports precede value imports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ImportKind {
    /// `import type ...`
    Type,
    /// Regular import
    #[default]
    Value,
}

/// Statement bucket in fixed priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// `import 'polyfill'`
    SideEffect,
    /// `import * as ns from 'mod'`
    Namespace,
    /// `import d from 'mod'`, including `import d, { a } from 'mod'`
    Default,
    /// `import { a, b } from 'mod'`
    Named,
}

/// Which attribute a bucket sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Module source string, compared as written
    ModuleSource,
    /// Local binding name, lowercased before comparison
    LocalName,
}

impl Bucket {
    /// The attribute elements of this bucket are sorted by.
    pub const fn key_source(self) -> KeySource {
        match self {
            Bucket::SideEffect | Bucket::Named => KeySource::ModuleSource,
            Bucket::Namespace | Bucket::Default => KeySource::LocalName,
        }
    }
}

// =============================================================================
// Sort keys
// =============================================================================

/// Comparison key of one element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SortKey(CompactString);

impl SortKey {
    /// Key compared as written (collation is still case-insensitive)
    pub fn verbatim(text: &str) -> Self {
        Self(CompactString::from(text))
    }

    /// Key lowercased up front, so case never breaks ties
    pub fn folded(text: &str) -> Self {
        Self(CompactString::from(text.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        locale_cmp(&self.0, &other.0)
    }
}

/// Everything the classifier needs to place one import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementKey {
    pub kind: ImportKind,
    pub bucket: Bucket,
    pub key: SortKey,
}

impl StatementKey {
    /// Build a key from the statement's attributes.
    ///
    /// `local_name` is the binding of the first specifier; it is only read
    /// for buckets keyed by local name.
    pub fn new(kind: ImportKind, bucket: Bucket, source: &str, local_name: Option<&str>) -> Self {
        let key = match bucket.key_source() {
            KeySource::ModuleSource => SortKey::verbatim(source),
            KeySource::LocalName => SortKey::folded(local_name.unwrap_or_default()),
        };
        Self { kind, bucket, key }
    }
}

impl PartialOrd for StatementKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StatementKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then(self.bucket.cmp(&other.bucket))
            .then_with(|| self.key.cmp(&other.key))
    }
}

// =============================================================================
// Canonical order
// =============================================================================

/// Target order of statements, as identities into `keys`.
pub fn canonical_statement_order(keys: &[StatementKey]) -> Vec<ElementId> {
    canonical_order(keys)
}

/// Target order of named items in one statement, keyed by imported name.
pub fn canonical_specifier_order(keys: &[SortKey]) -> Vec<ElementId> {
    canonical_order(keys)
}

/// Stable sort of source-order identities by key.
fn canonical_order<K: Ord>(keys: &[K]) -> Vec<ElementId> {
    let mut order = ElementId::sequence(keys.len());
    // `sort_by` is stable: equal keys keep source order
    order.sort_by(|a, b| keys[a.index()].cmp(&keys[b.index()]));
    order
}

// =============================================================================
// Tests
// =============================================================================
