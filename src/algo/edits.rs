//! Edit Script Builder
//!
//! Turns a `SequenceDiff` into text edits: one remove/insert pair per moved
//! element, anchored to the nearest preceding unchanged element.
//!
//! # Architecture: Plan/Edit Separation
//!
//! ```text
//! plan_moves(diff)            -> Vec<MovePlan>       // identities + anchors
//!       |
//!       v
//! edits_for_move(plan, ...)   -> [EditOperation]      // text ranges
//! ```
//!
//! Plans are cheap and computed eagerly; text edits are only produced when a
//! host asks for the fix of one violation.
//!
//! # Delimiters
//!
//! | Layout | Removal takes | Insertion appends |
//! |--------|---------------|-------------------|
//! | `Lines` | trailing line break and next indentation, or same-line whitespace | source line break + anchor indentation |
//! | `Delimited` | one comma (following, else preceding) | comma matching the list style |

use smallvec::{smallvec, SmallVec};

use crate::error::{OrderError, OrderResult};
use crate::id::ElementId;
use crate::span::TextRange;

use super::diff::SequenceDiff;

/// Edits produced for one moved element.
pub type EditOps = SmallVec<[EditOperation; 3]>;

// =============================================================================
// Public Types
// =============================================================================

/// Where a moved element is re-inserted
///
/// Anchors reference unchanged elements by identity, never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Before every other element of the sequence
    Start,
    /// Directly after an unchanged element
    After(ElementId),
}

/// A text change against the original source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Delete the covered text
    RemoveRange(TextRange),
    /// Insert `text` at `anchor.end`
    InsertAfter { anchor: TextRange, text: String },
}

impl EditOperation {
    /// Source range this edit replaces (empty for insertions)
    pub fn range(&self) -> TextRange {
        match self {
            Self::RemoveRange(range) => *range,
            Self::InsertAfter { anchor, .. } => TextRange::point(anchor.end),
        }
    }

    /// Replacement text
    pub fn text(&self) -> &str {
        match self {
            Self::RemoveRange(_) => "",
            Self::InsertAfter { text, .. } => text,
        }
    }
}

/// How elements of a sequence are laid out in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLayout {
    /// One element per line (statements in a file)
    Lines {
        /// Offset of the first element of the block
        block_start: usize,
    },
    /// Comma separated between braces (named items in one statement)
    Delimited {
        open: TextRange,
        close: TextRange,
        /// Comma tokens between the braces, in source order
        commas: SmallVec<[TextRange; 8]>,
    },
}

/// A moved element and where it goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub id: ElementId,
    pub original_position: usize,
    pub target_position: usize,
    pub anchor: Anchor,
}

/// A moved element with its edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedElement {
    pub plan: MovePlan,
    pub ops: EditOps,
}

// =============================================================================
// Public API
// =============================================================================

/// One plan per moved element, ascending by target position.
pub fn plan_moves(diff: &SequenceDiff) -> OrderResult<Vec<MovePlan>> {
    diff.added
        .iter()
        .map(|&(target_position, id)| {
            let original_position = diff.removed_position(id).ok_or(OrderError::DiffMismatch {
                added: diff.added.len(),
                removed: diff.removed.len(),
            })?;
            let anchor = match diff.anchor_before(target_position) {
                Some(unchanged) => Anchor::After(unchanged),
                None => Anchor::Start,
            };
            Ok(MovePlan {
                id,
                original_position,
                target_position,
                anchor,
            })
        })
        .collect()
}

/// Plans and edits for every moved element, ascending by target position.
///
/// `ranges` holds the source range of each element, indexed by `ElementId`.
pub fn build_edits(
    diff: &SequenceDiff,
    ranges: &[TextRange],
    layout: &ListLayout,
    source: &str,
) -> OrderResult<Vec<MovedElement>> {
    plan_moves(diff)?
        .into_iter()
        .map(|plan| {
            let ops = edits_for_move(&plan, ranges, layout, source)?;
            Ok(MovedElement { plan, ops })
        })
        .collect()
}

/// Remove + insert edits for one moved element.
pub fn edits_for_move(
    plan: &MovePlan,
    ranges: &[TextRange],
    layout: &ListLayout,
    source: &str,
) -> OrderResult<EditOps> {
    let element = element_range(ranges, plan.id)?;
    let anchor = match plan.anchor {
        Anchor::Start => None,
        Anchor::After(id) => Some(element_range(ranges, id)?),
    };

    let ops = match layout {
        ListLayout::Lines { block_start } => line_edits(element, anchor, *block_start, source)?,
        ListLayout::Delimited { open, close, commas } => {
            delimited_edits(element, anchor, *open, *close, commas, source)?
        }
    };

    tracing::trace!(
        element = %plan.id,
        from = plan.original_position,
        to = plan.target_position,
        "move"
    );

    Ok(ops)
}

// =============================================================================
// Statement level: one element per line
// =============================================================================

fn line_edits(
    element: TextRange,
    anchor: Option<TextRange>,
    block_start: usize,
    source: &str,
) -> OrderResult<EditOps> {
    let element = with_trailing_comment(source, element);
    let anchor = anchor.map(|anchor| with_trailing_comment(source, anchor));
    let text = slice(source, element)?;
    let removal = line_removal(source, element);
    let newline = line_break(source, element.end);

    let insert = match anchor {
        Some(anchor) => EditOperation::InsertAfter {
            anchor,
            text: format!("{}{}{}", newline, indentation_before(source, anchor.start), text),
        },
        None => EditOperation::InsertAfter {
            anchor: TextRange::point(block_start),
            text: format!("{}{}{}", text, newline, indentation_before(source, block_start)),
        },
    };

    Ok(smallvec![EditOperation::RemoveRange(removal), insert])
}

/// Extend a statement over a comment that closes its line, so the comment
/// moves with it.
fn with_trailing_comment(source: &str, range: TextRange) -> TextRange {
    let rest = source.get(range.end..).unwrap_or_default();
    let line = rest.split('\n').next().unwrap_or_default().trim_end_matches('\r');
    let comment = line.trim_start_matches([' ', '\t']);
    let gap = line.len() - comment.len();

    let len = if comment.starts_with("//") {
        comment.trim_end().len()
    } else if comment.starts_with("/*") {
        match comment[2..].find("*/").map(|i| i + 4) {
            Some(close) if comment[close..].trim().is_empty() => close,
            _ => return range,
        }
    } else {
        return range;
    };

    TextRange::new(range.start, range.end + gap + len)
}

/// Removal span of a statement.
///
/// - Earlier code on the same line: the whitespace before the statement goes,
///   the line break stays
/// - Later code on the same line: the whitespace after the statement goes
/// - Alone on its line: the line break and the next line's indentation go;
///   the last statement of a file takes the line break before it instead
fn line_removal(source: &str, element: TextRange) -> TextRange {
    let before = source.get(..element.start).unwrap_or_default();
    let head = before.trim_end_matches([' ', '\t']);
    if !head.is_empty() && !head.ends_with('\n') {
        return TextRange::new(head.len(), element.end);
    }

    let end = line_removal_end(source, element.end);
    let rest = source.get(end..).unwrap_or_default();
    if end > element.end || !rest.trim().is_empty() {
        return TextRange::new(element.start, end);
    }
    match head.strip_suffix('\n') {
        Some(prev) => TextRange::new(prev.trim_end_matches('\r').len(), source.len()),
        None => TextRange::new(element.start, end),
    }
}

/// End of the removal span for a statement ending at `end`.
///
/// Takes horizontal whitespace, the line break and the next line's
/// indentation, or only the whitespace when more code follows on the line.
fn line_removal_end(source: &str, end: usize) -> usize {
    let bytes = source.as_bytes();
    let mut idx = end;
    while idx < bytes.len() && matches!(bytes[idx], b' ' | b'\t') {
        idx += 1;
    }
    match bytes.get(idx) {
        Some(b'\n') => {}
        Some(b'\r') if bytes.get(idx + 1) == Some(&b'\n') => idx += 1,
        Some(_) => return idx,
        None => return end,
    }
    idx += 1;
    while idx < bytes.len() && matches!(bytes[idx], b' ' | b'\t') {
        idx += 1;
    }
    idx
}

/// Line separator the source uses around `offset`: the break ending that
/// line, else the last one before it.
fn line_break(source: &str, offset: usize) -> &'static str {
    let after = source
        .get(offset..)
        .and_then(|rest| rest.find('\n'))
        .map(|i| offset + i);
    let newline = after.or_else(|| source.get(..offset).and_then(|head| head.rfind('\n')));
    match newline {
        Some(nl) if nl > 0 && source.as_bytes()[nl - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Horizontal whitespace between the line start and `offset`, if the line has
/// nothing else before `offset`.
fn indentation_before(source: &str, offset: usize) -> &str {
    let prefix = source.get(..offset).unwrap_or_default();
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let indent = &prefix[line_start..];
    if indent.bytes().all(|b| b == b' ' || b == b'\t') {
        indent
    } else {
        ""
    }
}

// =============================================================================
// Specifier level: comma separated between braces
// =============================================================================

fn delimited_edits(
    element: TextRange,
    anchor: Option<TextRange>,
    open: TextRange,
    close: TextRange,
    commas: &[TextRange],
    source: &str,
) -> OrderResult<EditOps> {
    if open.end > element.start || element.end > close.start {
        return Err(OrderError::missing_delimiter("{", element.start));
    }

    let preceding = commas
        .iter()
        .rev()
        .find(|c| c.end <= element.start && c.start >= open.end)
        .copied();
    let following = following_comma(commas, element, close);

    // Leading whitespace travels with the element
    let leading_start = preceding.map_or(open.end, |c| c.end);
    let text = slice(source, TextRange::new(leading_start, element.end))?;

    let removal = match (following, preceding) {
        (Some(next), _) => TextRange::new(leading_start, next.end),
        (None, Some(prev)) => TextRange::new(prev.start, element.end),
        (None, None) => TextRange::new(open.end, element.end),
    };

    let insert = match anchor {
        None => EditOperation::InsertAfter {
            anchor: open,
            text: format!("{},", text),
        },
        Some(anchor) => match following_comma(commas, anchor, close) {
            Some(comma) => EditOperation::InsertAfter {
                anchor: comma,
                text: format!("{},", text),
            },
            // Anchor was last without a trailing comma: synthesize one
            None => EditOperation::InsertAfter {
                anchor,
                text: format!(",{}", text),
            },
        },
    };

    Ok(smallvec![EditOperation::RemoveRange(removal), insert])
}

/// First comma after `range` and before the closing brace
fn following_comma(commas: &[TextRange], range: TextRange, close: TextRange) -> Option<TextRange> {
    commas
        .iter()
        .find(|c| c.start >= range.end && c.end <= close.start)
        .copied()
}

// =============================================================================
// Helper Functions
// =============================================================================

fn element_range(ranges: &[TextRange], id: ElementId) -> OrderResult<TextRange> {
    ranges
        .get(id.index())
        .copied()
        .ok_or_else(|| OrderError::invalid_edit(format!("unknown element {}", id)))
}

fn slice(source: &str, range: TextRange) -> OrderResult<&str> {
    range
        .slice(source)
        .ok_or_else(|| OrderError::invalid_edit(format!("range {} outside source", range)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::diff;

    fn id(n: usize) -> ElementId {
        ElementId::from_index(n)
    }

    fn ids(nums: &[usize]) -> Vec<ElementId> {
        nums.iter().map(|&n| ElementId::from_index(n)).collect()
    }

    /// Ranges of each `name` in `source`, in order of appearance
    fn ranges_of(source: &str, names: &[&str]) -> Vec<TextRange> {
        let mut from = 0;
        names
            .iter()
            .map(|name| {
                let start = source[from..].find(name).unwrap() + from;
                from = start + name.len();
                TextRange::new(start, start + name.len())
            })
            .collect()
    }

    fn delimited(source: &str) -> ListLayout {
        let open = source.find('{').unwrap();
        let close = source.find('}').unwrap();
        let commas = source[open..close]
            .match_indices(',')
            .map(|(i, _)| TextRange::new(open + i, open + i + 1))
            .collect();
        ListLayout::Delimited {
            open: TextRange::new(open, open + 1),
            close: TextRange::new(close, close + 1),
            commas,
        }
    }

    #[test]
    fn test_plan_anchor_selection() {
        // zeta, alpha, beta -> alpha, beta, zeta
        let d = diff(&ids(&[0, 1, 2]), &ids(&[1, 2, 0])).unwrap();
        let plans = plan_moves(&d).unwrap();
        assert_eq!(
            plans,
            vec![MovePlan {
                id: id(0),
                original_position: 0,
                target_position: 2,
                anchor: Anchor::After(id(2)),
            }]
        );
    }

    #[test]
    fn test_plan_start_anchor() {
        // b, c, a -> a, b, c
        let d = diff(&ids(&[0, 1, 2]), &ids(&[2, 0, 1])).unwrap();
        let plans = plan_moves(&d).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, id(2));
        assert_eq!(plans[0].anchor, Anchor::Start);
    }

    #[test]
    fn test_specifier_move_to_end_without_trailing_comma() {
        let src = "import { zeta, alpha, beta } from 'm';";
        let ranges = ranges_of(src, &["zeta", "alpha", "beta"]);
        let d = diff(&ids(&[0, 1, 2]), &ids(&[1, 2, 0])).unwrap();
        let moved = build_edits(&d, &ranges, &delimited(src), src).unwrap();

        assert_eq!(moved.len(), 1);
        let ops = &moved[0].ops;
        // " zeta," goes, ", zeta" lands after beta
        assert_eq!(ops[0], EditOperation::RemoveRange(TextRange::new(8, 14)));
        assert_eq!(
            ops[1],
            EditOperation::InsertAfter {
                anchor: ranges[2],
                text: ", zeta".to_string(),
            }
        );
    }

    #[test]
    fn test_specifier_last_element_takes_preceding_comma() {
        let src = "import { b, c, a } from 'm';";
        let ranges = ranges_of(src, &["b", "c", "a"]);
        let d = diff(&ids(&[0, 1, 2]), &ids(&[2, 0, 1])).unwrap();
        let moved = build_edits(&d, &ranges, &delimited(src), src).unwrap();

        let ops = &moved[0].ops;
        let comma_after_c = src.find("c,").unwrap() + 1;
        assert_eq!(
            ops[0],
            EditOperation::RemoveRange(TextRange::new(comma_after_c, ranges[2].end))
        );
        assert_eq!(ops[1].range(), TextRange::point(src.find('{').unwrap() + 1));
        assert_eq!(ops[1].text(), " a,");
    }

    #[test]
    fn test_specifier_insert_after_trailing_comma() {
        let src = "import {\n    zeta,\n    alpha,\n    beta,\n} from 'm';";
        let ranges = ranges_of(src, &["zeta", "alpha", "beta"]);
        let d = diff(&ids(&[0, 1, 2]), &ids(&[1, 2, 0])).unwrap();
        let moved = build_edits(&d, &ranges, &delimited(src), src).unwrap();

        let ops = &moved[0].ops;
        assert_eq!(ops[0].range().slice(src), Some("\n    zeta,"));
        let beta_comma = ranges[2].end;
        assert_eq!(ops[1].range(), TextRange::point(beta_comma + 1));
        assert_eq!(ops[1].text(), "\n    zeta,");
    }

    #[test]
    fn test_statement_move_after_anchor() {
        let src = "import { b } from 'mod';\nimport c from 'x';\n";
        let ranges = ranges_of(src, &["import { b } from 'mod';", "import c from 'x';"]);
        let d = diff(&ids(&[0, 1]), &ids(&[1, 0])).unwrap();
        let layout = ListLayout::Lines { block_start: 0 };
        let moved = build_edits(&d, &ranges, &layout, src).unwrap();

        assert_eq!(moved.len(), 1);
        let ops = &moved[0].ops;
        assert_eq!(ops[0].range().slice(src), Some("import { b } from 'mod';\n"));
        assert_eq!(ops[1].range(), TextRange::point(ranges[1].end));
        assert_eq!(ops[1].text(), "\nimport { b } from 'mod';");
    }

    #[test]
    fn test_statement_move_to_block_start_keeps_indentation() {
        let src = "<script>\n  import b from 'b';\n  import a from 'a';\n</script>\n";
        let ranges = ranges_of(src, &["import b from 'b';", "import a from 'a';"]);
        let d = diff(&ids(&[0, 1]), &ids(&[1, 0])).unwrap();
        let plans = plan_moves(&d).unwrap();
        let layout = ListLayout::Lines { block_start: ranges[0].start };

        for plan in plans {
            let ops = edits_for_move(&plan, &ranges, &layout, src).unwrap();
            match plan.anchor {
                Anchor::Start => {
                    assert_eq!(ops[0].range().slice(src), Some("import a from 'a';\n"));
                    assert_eq!(ops[1].text(), "import a from 'a';\n  ");
                }
                Anchor::After(_) => {
                    assert_eq!(ops[0].range().slice(src), Some("import b from 'b';\n  "));
                    assert_eq!(ops[1].text(), "\n  import b from 'b';");
                }
            }
        }
    }

    #[test]
    fn test_statement_sharing_a_line_takes_whitespace() {
        let src = "import b from 'b'; import a from 'a';\n";
        let b = TextRange::new(0, 18);
        assert_eq!(line_removal(src, b).slice(src), Some("import b from 'b'; "));

        let src = "import a from 'a';   import c from 'c';\nimport b from 'b';\n";
        let c = TextRange::new(21, 39);
        assert_eq!(line_removal(src, c).slice(src), Some("   import c from 'c';"));

        let src = "import b from 'b';   \nimport a from 'a';\n";
        assert_eq!(line_removal_end(src, 18), 22);
    }

    #[test]
    fn test_trailing_comment_moves_with_statement() {
        let src = "import b from 'b'; // note b\nimport a from 'a'; /* a */\n";
        let ranges = ranges_of(src, &["import b from 'b';", "import a from 'a';"]);
        assert_eq!(
            with_trailing_comment(src, ranges[0]).slice(src),
            Some("import b from 'b'; // note b")
        );

        let d = diff(&ids(&[0, 1]), &ids(&[1, 0])).unwrap();
        let layout = ListLayout::Lines { block_start: 0 };
        let moved = build_edits(&d, &ranges, &layout, src).unwrap();
        let ops = &moved[0].ops;
        assert_eq!(ops[0].range().slice(src), Some("import b from 'b'; // note b\n"));
        // Lands after the anchor's own comment
        assert_eq!(ops[1].range(), TextRange::point(src.len() - 1));
        assert_eq!(ops[1].text(), "\nimport b from 'b'; // note b");
    }

    #[test]
    fn test_block_comment_followed_by_code_stays() {
        let src = "import b from 'b'; /* x */ foo();\n";
        let b = TextRange::new(0, 18);
        assert_eq!(with_trailing_comment(src, b), b);
    }

    #[test]
    fn test_crlf_line_breaks_are_reused() {
        let src = "import b from 'b';\r\nimport a from 'a';\r\n";
        let ranges = ranges_of(src, &["import b from 'b';", "import a from 'a';"]);
        let d = diff(&ids(&[0, 1]), &ids(&[1, 0])).unwrap();
        let layout = ListLayout::Lines { block_start: 0 };
        let moved = build_edits(&d, &ranges, &layout, src).unwrap();

        let ops = &moved[0].ops;
        assert_eq!(ops[0].range().slice(src), Some("import b from 'b';\r\n"));
        assert_eq!(ops[1].text(), "\r\nimport b from 'b';");
        assert_eq!(line_break("a\nb", 0), "\n");
        assert_eq!(line_break("a\r\nb", 3), "\r\n");
    }

    #[test]
    fn test_last_statement_takes_preceding_line_break() {
        let src = "import b from 'b';\nimport a from 'a';";
        let a = TextRange::new(19, src.len());
        assert_eq!(line_removal(src, a).slice(src), Some("\nimport a from 'a';"));
        let src = "import b from 'b';\nimport a from 'a';\n";
        let a = TextRange::new(19, src.len() - 1);
        assert_eq!(line_removal(src, a).slice(src), Some("import a from 'a';\n"));
    }

    #[test]
    fn test_missing_brace_is_an_error() {
        let src = "import { a, b } from 'm';";
        let ranges = ranges_of(src, &["a", "b"]);
        let layout = ListLayout::Delimited {
            open: TextRange::new(20, 21),
            close: TextRange::new(22, 23),
            commas: SmallVec::new(),
        };
        let plan = MovePlan {
            id: id(1),
            original_position: 1,
            target_position: 0,
            anchor: Anchor::Start,
        };
        let err = edits_for_move(&plan, &ranges, &layout, src).unwrap_err();
        assert!(matches!(err, OrderError::MissingDelimiter { expected: "{", .. }));
    }
}
