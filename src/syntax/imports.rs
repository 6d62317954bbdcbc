//! Import declaration scanner
//!
//! Walks the top level of a tree-sitter syntax tree and collects `import`
//! declarations with the ranges the reordering engine needs: the statement
//! itself, each specifier, and the braces and commas of the named list.
//!
//! Recognized forms:
//!
//! ```text
//! import 'side-effect';
//! import d from 'm';
//! import * as ns from 'm';
//! import { a, b as c, type T, 'str' as s } from 'm';
//! import d, { a } from 'm';
//! import d, * as ns from 'm';
//! import type { T } from 'm';
//! import json from './data.json' with { type: 'json' };
//! ```
//!
//! Not import declarations, skipped: `import(...)`, `import.meta`,
//! `import x = require('m')`, and anything nested inside a block.
//!
//! # Syntax errors
//!
//! | Error location | Result |
//! |----------------|--------|
//! | inside an `import` declaration | `OrderError::Parse` at the `import` keyword |
//! | anywhere else | ignored, imports are still scanned |

use compact_str::CompactString;
use smallvec::SmallVec;
use tree_sitter::Node;

use crate::classify::{Bucket, ImportKind, StatementKey};
use crate::error::{OrderError, OrderResult};
use crate::span::TextRange;

use super::grammar::Grammar;

// =============================================================================
// Syntax nodes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `d` in `import d from 'm'`
    Default,
    /// `* as ns`
    Namespace,
    /// `a` or `a as b` inside braces
    Named,
}

/// One binding of an import declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub kind: SpecifierKind,
    /// Whole specifier text, e.g. `type a as b`
    pub range: TextRange,
    /// Exported name being imported (`a` in `a as b`); `*` for namespaces
    pub imported: CompactString,
    /// Local binding name (`b` in `a as b`)
    pub local: CompactString,
}

/// A top-level import declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// From `import` through the optional semicolon
    pub range: TextRange,
    pub kind: ImportKind,
    /// Module source string value
    pub source: CompactString,
    pub specifiers: SmallVec<[Specifier; 4]>,
    /// `{` and `}` of the named list, if there is one
    pub braces: Option<(TextRange, TextRange)>,
    /// Commas between the braces, in source order
    pub commas: SmallVec<[TextRange; 8]>,
}

impl ImportDecl {
    /// Bucket by first specifier, as the classifier expects.
    pub fn bucket(&self) -> Bucket {
        match self.specifiers.first().map(|s| s.kind) {
            None => Bucket::SideEffect,
            Some(SpecifierKind::Default) => Bucket::Default,
            Some(SpecifierKind::Namespace) => Bucket::Namespace,
            Some(SpecifierKind::Named) => Bucket::Named,
        }
    }

    /// Classifier key for this statement.
    pub fn statement_key(&self) -> StatementKey {
        let local = self.specifiers.first().map(|s| s.local.as_str());
        StatementKey::new(self.kind, self.bucket(), &self.source, local)
    }

    /// Named items inside the braces, in source order.
    pub fn named_specifiers(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers
            .iter()
            .filter(|s| s.kind == SpecifierKind::Named)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Scan `source` for top-level import declarations, in source order.
pub fn scan_imports(source: &str, grammar: Grammar) -> OrderResult<Vec<ImportDecl>> {
    let tree = grammar.parse(source)?;
    let root = tree.root_node();

    let top_level: Vec<Node<'_>> = if root.is_error() {
        vec![root]
    } else {
        root.children(&mut root.walk()).collect()
    };

    let mut imports = Vec::new();
    for node in top_level {
        match node.kind() {
            "import_statement" if node.has_error() => {
                return Err(malformed(node));
            }
            "import_statement" => imports.extend(import_decl(node, source)),
            _ if node.has_error() => {
                if let Some(keyword) = import_keyword(node, source) {
                    return Err(malformed(keyword));
                }
                tracing::debug!(
                    offset = node.start_byte(),
                    kind = node.kind(),
                    "syntax error outside import declarations"
                );
            }
            _ => {}
        }
    }

    Ok(imports)
}

/// Value of a string literal, quotes removed and simple escapes resolved.
pub fn string_value(literal: &str) -> String {
    let inner = literal
        .get(1..literal.len().saturating_sub(1))
        .unwrap_or(literal);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('0') => value.push('\0'),
            Some(other) => value.push(other),
            None => {}
        }
    }
    value
}

// =============================================================================
// Tree walking
// =============================================================================

fn import_decl(node: Node<'_>, source: &str) -> Option<ImportDecl> {
    let children: Vec<Node<'_>> = node.children(&mut node.walk()).collect();

    // `import x = require('m')`
    if children.iter().any(|c| c.kind() == "import_require_clause") {
        return None;
    }

    let module = node.child_by_field_name("source")?;
    let kind = if children.iter().any(|c| !c.is_named() && c.kind() == "type") {
        ImportKind::Type
    } else {
        ImportKind::Value
    };

    // Comments inside the node do not extend the statement
    let end = children
        .iter()
        .filter(|c| c.kind() != "comment")
        .map(|c| c.end_byte())
        .max()
        .unwrap_or(node.end_byte());
    let start = node.start_byte();
    let end = start + source.get(start..end).map_or(0, |t| t.trim_end().len());

    let mut decl = ImportDecl {
        range: TextRange::new(start, end),
        kind,
        source: CompactString::from(string_value(text(module, source))),
        specifiers: SmallVec::new(),
        braces: None,
        commas: SmallVec::new(),
    };

    if let Some(clause) = children.iter().find(|c| c.kind() == "import_clause") {
        read_clause(*clause, source, &mut decl);
    }

    Some(decl)
}

fn read_clause(clause: Node<'_>, source: &str, decl: &mut ImportDecl) {
    for child in clause.children(&mut clause.walk()) {
        match child.kind() {
            "identifier" => decl.specifiers.push(Specifier {
                kind: SpecifierKind::Default,
                range: range_of(child),
                imported: CompactString::from("default"),
                local: CompactString::from(text(child, source)),
            }),
            "namespace_import" => {
                let local = child
                    .named_children(&mut child.walk())
                    .find(|n| n.kind() == "identifier")
                    .map(|n| text(n, source))
                    .unwrap_or_default();
                decl.specifiers.push(Specifier {
                    kind: SpecifierKind::Namespace,
                    range: range_of(child),
                    imported: CompactString::from("*"),
                    local: CompactString::from(local),
                });
            }
            "named_imports" => read_named(child, source, decl),
            _ => {}
        }
    }
}

fn read_named(list: Node<'_>, source: &str, decl: &mut ImportDecl) {
    let mut open = None;
    let mut close = None;

    for child in list.children(&mut list.walk()) {
        match child.kind() {
            "{" => open = Some(range_of(child)),
            "}" => close = Some(range_of(child)),
            "," => decl.commas.push(range_of(child)),
            "import_specifier" => decl.specifiers.extend(named_specifier(child, source)),
            _ => {}
        }
    }

    decl.braces = open.zip(close);
}

/// `[type] name [as alias]` where name may be a string literal.
fn named_specifier(node: Node<'_>, source: &str) -> Option<Specifier> {
    let name = node.child_by_field_name("name")?;
    let imported = name_value(name, source);
    let local = match node.child_by_field_name("alias") {
        Some(alias) => name_value(alias, source),
        None => imported.clone(),
    };
    Some(Specifier {
        kind: SpecifierKind::Named,
        range: range_of(node),
        imported,
        local,
    })
}

/// First `import` keyword of an erroneous subtree that starts a declaration
/// rather than `import(...)` or `import.meta`.
fn import_keyword<'t>(node: Node<'t>, source: &str) -> Option<Node<'t>> {
    if !node.is_named() && node.kind() == "import" {
        let rest = source.get(node.end_byte()..).unwrap_or_default().trim_start();
        return (!rest.starts_with(['(', '.'])).then_some(node);
    }
    let found = node
        .children(&mut node.walk())
        .find_map(|child| import_keyword(child, source));
    found
}

// =============================================================================
// Helper Functions
// =============================================================================

fn malformed(node: Node<'_>) -> OrderError {
    OrderError::parse(node.start_byte(), "malformed import declaration")
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or_default()
}

fn name_value(node: Node<'_>, source: &str) -> CompactString {
    match node.kind() {
        "string" => CompactString::from(string_value(text(node, source))),
        _ => CompactString::from(text(node, source)),
    }
}

fn range_of(node: Node<'_>) -> TextRange {
    TextRange::new(node.start_byte(), node.end_byte())
}

// =============================================================================
// Tests
// =============================================================================
