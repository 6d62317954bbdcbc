//! End-to-end fixing of whole source files.

use import_order::prelude::*;
use pretty_assertions::assert_eq;

// =============================================================================
// Helper Functions
// =============================================================================

fn fix(source: &str) -> String {
    fix_with(source, &OrderConfig::default())
}

fn fix_with(source: &str, config: &OrderConfig) -> String {
    let outcome = fix_source(source, config).unwrap();
    assert!(outcome.converged, "did not converge:\n{}", outcome.output);
    // The fixed output must itself be clean
    let rerun = ImportOrder::new(config.clone()).check(&outcome.output).unwrap();
    assert!(rerun.is_clean());
    outcome.output
}

// =============================================================================
// Canonical scenarios
// =============================================================================

#[test]
fn default_import_precedes_named_import() {
    let src = "import { b, a } from 'mod';\nimport c from 'x';\n";
    assert_eq!(fix(src), "import c from 'x';\nimport { a, b } from 'mod';\n");
}

#[test]
fn type_before_value_is_already_sorted() {
    let src = "import type { Foo } from 'foo';\nimport bar from 'bar';\n";
    let report = ImportOrder::default().check(src).unwrap();
    assert!(report.is_clean());
    assert_eq!(fix(src), src);
}

#[test]
fn only_the_out_of_place_specifier_moves() {
    let src = "import { zeta, alpha, beta } from 'm';";
    let report = ImportOrder::default().check(src).unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].range.slice(src), Some("zeta"));
    assert_eq!(fix(src), "import { alpha, beta, zeta } from 'm';");
}

#[test]
fn specifier_comparison_ignores_case() {
    assert_eq!(fix("import { B, a } from 'm';"), "import { a, B } from 'm';");
}

// =============================================================================
// Layout preservation
// =============================================================================

#[test]
fn multiline_specifiers_keep_trailing_commas() {
    let src = "import {\n    zeta,\n    alpha,\n    beta,\n} from 'm';\n";
    assert_eq!(fix(src), "import {\n    alpha,\n    beta,\n    zeta,\n} from 'm';\n");
}

#[test]
fn aliased_and_inline_type_specifiers_sort_by_imported_name() {
    let src = "import { type Z, y as b, X } from 'm';";
    assert_eq!(fix(src), "import { X, y as b, type Z } from 'm';");
}

#[test]
fn full_bucket_order_with_code_after_imports() {
    let src = "\
import './styles.css';
import { useState } from 'react';
import * as path from 'path';
import type { Props } from './types';
import Button from './Button';

const x = 1;
";
    let expected = "\
import type { Props } from './types';
import './styles.css';
import * as path from 'path';
import Button from './Button';
import { useState } from 'react';

const x = 1;
";
    assert_eq!(fix(src), expected);
}

#[test]
fn last_statement_without_trailing_newline() {
    let src = "import b from 'b';\nimport c from 'c';\nimport a from 'a';";
    assert_eq!(fix(src), "import a from 'a';\nimport b from 'b';\nimport c from 'c';");
}

#[test]
fn statements_sharing_a_line_are_split() {
    let src = "import b from 'b'; import a from 'a';\n";
    assert_eq!(fix(src), "import a from 'a';\nimport b from 'b';\n");
}

#[test]
fn trailing_comment_moves_with_its_statement() {
    let src = "import b from 'b'; // note b\nimport a from 'a';\n";
    assert_eq!(fix(src), "import a from 'a';\nimport b from 'b'; // note b\n");
}

#[test]
fn crlf_line_endings_are_preserved() {
    let src = "import c from 'c';\r\nimport b from 'b';\r\nimport a from 'a';\r\n";
    assert_eq!(
        fix(src),
        "import a from 'a';\r\nimport b from 'b';\r\nimport c from 'c';\r\n"
    );
}

#[test]
fn accented_names_sort_with_their_base_letter() {
    let sorted = "import { écran, zeta } from 'm';";
    assert!(ImportOrder::default().check(sorted).unwrap().is_clean());
    assert_eq!(fix("import { zeta, écran } from 'm';"), sorted);
}

#[test]
fn identical_statements_are_distinct_elements() {
    let src = "import b from 'b';\nimport a from 'a';\nimport b from 'b';\n";
    assert_eq!(fix(src), "import a from 'a';\nimport b from 'b';\nimport b from 'b';\n");
}

#[test]
fn non_import_code_is_ignored() {
    let src = "\
import b from 'b';
const s = `${import.meta.url}`;
const lazy = () => import('./lazy');
";
    let report = ImportOrder::default().check(src).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.stats.statements, 1);
}

#[test]
fn jsx_component_file() {
    let src = "\
import b from 'b';
import a from 'a';

export const C = () => <div>hi</div>;
export const D = () => (
  <p>
    Don't
  </p>
);
";
    let expected = "\
import a from 'a';
import b from 'b';

export const C = () => <div>hi</div>;
export const D = () => (
  <p>
    Don't
  </p>
);
";
    assert_eq!(fix(src), expected);
    assert_eq!(fix_with(src, &OrderConfig::for_path("src/App.jsx")), expected);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn svelte_combined_file_only_orders_dedented_block() {
    let src = "  import b from 'b';\n  import a from 'a';\nimport z from 'z';\nimport y from 'y';\n";
    let config = OrderConfig::for_path("Component.svelte");
    assert_eq!(
        fix_with(src, &config),
        "  import b from 'b';\n  import a from 'a';\nimport y from 'y';\nimport z from 'z';\n"
    );
}

#[test]
fn specifiers_only_leaves_statement_order() {
    let src = "import { b, a } from 'mod';\nimport c from 'x';\n";
    assert_eq!(
        fix_with(src, &OrderConfig::specifiers_only()),
        "import { a, b } from 'mod';\nimport c from 'x';\n"
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unparsable_file_is_an_error() {
    let err = fix_source("import { a, b from 'm';", &OrderConfig::default()).unwrap_err();
    assert!(matches!(err, OrderError::Parse { .. }));
}

#[test]
fn batch_reports_per_file() {
    let files = vec![
        SourceFile::new("ok.ts", "import a from 'a';\n"),
        SourceFile::new("bad.ts", "import { a from 'a';\n"),
        SourceFile::new("unsorted.ts", "import { zeta, alpha, beta } from 'm';\n"),
    ];
    let results = check_batch(&OrderConfig::default(), &files);
    assert!(results[0].as_ref().unwrap().violations.is_empty());
    assert!(matches!(results[1], Err(OrderError::Parse { offset: 0, .. })));
    let unsorted = results[2].as_ref().unwrap();
    assert_eq!(unsorted.name, "unsorted.ts");
    assert_eq!(unsorted.violations, vec![(ViolationKind::Specifier, TextRange::new(9, 13))]);
}
