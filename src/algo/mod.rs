//! Algorithm implementations for sequence reordering.
//!
//! - `myers`: Myers LCS over element identities
//! - `diff`: unchanged / removed / added split between two orders
//! - `edits`: anchor-based remove/insert edits per moved element

mod diff;
mod edits;
mod myers;

pub use diff::{diff, PositionMap, SequenceDiff};
pub use edits::{
    build_edits, edits_for_move, plan_moves, Anchor, EditOperation, EditOps, ListLayout,
    MovePlan, MovedElement,
};
pub use myers::longest_common_subsequence;
