//! Sequence diff between an original and a canonical order
//!
//! Aligns two orderings of the same elements and splits them into:
//!
//! - **unchanged**: elements on the longest common subsequence (by identity)
//! - **removed**: every other element, keyed by original position
//! - **added**: the same elements, keyed by target position
//!
//! ```text
//! original: [zeta, alpha, beta]     target: [alpha, beta, zeta]
//! unchanged: {0: alpha, 1: beta}
//! removed:   {0: zeta}
//! added:     {2: zeta}
//! ```
//!
//! Because the target is a permutation of the original, `removed` and `added`
//! always hold the same elements. A count mismatch means the inputs broke that
//! contract and is reported as an error instead of producing a patch.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{OrderError, OrderResult};
use crate::id::ElementId;

use super::myers::longest_common_subsequence;

/// `(position, element)` entries, ascending by position.
pub type PositionMap = SmallVec<[(usize, ElementId); 8]>;

// =============================================================================
// Public Types
// =============================================================================

/// Result of aligning an original sequence with its target order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct SequenceDiff {
    /// Target position -> element, for elements whose relative order is kept
    pub unchanged: PositionMap,
    /// Original position -> element, for elements that move
    pub removed: PositionMap,
    /// Target position -> element, for elements that move
    pub added: PositionMap,
}

impl SequenceDiff {
    /// `|removed| + |added|`; zero iff both orders are identical
    pub fn distance(&self) -> usize {
        self.removed.len() + self.added.len()
    }

    /// Check if any element moved
    pub fn has_changes(&self) -> bool {
        self.distance() != 0
    }

    /// Original position of a moved element
    pub fn removed_position(&self, id: ElementId) -> Option<usize> {
        self.removed.iter().find(|(_, e)| *e == id).map(|(pos, _)| *pos)
    }

    /// Nearest unchanged element with a target position strictly before `position`
    pub fn anchor_before(&self, position: usize) -> Option<ElementId> {
        // `unchanged` is sorted by target position
        let idx = self.unchanged.partition_point(|(pos, _)| *pos < position);
        idx.checked_sub(1).map(|i| self.unchanged[i].1)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff `original` against `target`, a reordering of the same elements.
///
/// Identical orders short-circuit without running the LCS: every element is
/// unchanged.
pub fn diff(original: &[ElementId], target: &[ElementId]) -> OrderResult<SequenceDiff> {
    check_permutation(original, target)?;

    if original == target {
        return Ok(SequenceDiff {
            unchanged: target.iter().copied().enumerate().collect(),
            ..Default::default()
        });
    }

    let lcs = longest_common_subsequence(original, target);

    let mut in_lcs_old = vec![false; original.len()];
    let mut in_lcs_new = vec![false; target.len()];
    let mut result = SequenceDiff::default();

    for &(old_idx, new_idx) in &lcs {
        in_lcs_old[old_idx] = true;
        in_lcs_new[new_idx] = true;
        result.unchanged.push((new_idx, target[new_idx]));
    }

    result.removed = original
        .iter()
        .enumerate()
        .filter(|(pos, _)| !in_lcs_old[*pos])
        .map(|(pos, id)| (pos, *id))
        .collect();

    result.added = target
        .iter()
        .enumerate()
        .filter(|(pos, _)| !in_lcs_new[*pos])
        .map(|(pos, id)| (pos, *id))
        .collect();

    if result.added.len() != result.removed.len() {
        return Err(OrderError::DiffMismatch {
            added: result.added.len(),
            removed: result.removed.len(),
        });
    }

    tracing::trace!(
        kept = result.unchanged.len(),
        moved = result.added.len(),
        "sequence diff"
    );

    Ok(result)
}

/// Reject targets that are not a reordering of `original` by identity.
fn check_permutation(original: &[ElementId], target: &[ElementId]) -> OrderResult<()> {
    let mismatch = || OrderError::NotAPermutation {
        original: original.len(),
        target: target.len(),
    };

    if original.len() != target.len() {
        return Err(mismatch());
    }

    let mut counts: FxHashMap<ElementId, isize> = FxHashMap::default();
    for id in original {
        *counts.entry(*id).or_default() += 1;
    }
    for id in target {
        *counts.entry(*id).or_default() -= 1;
    }

    if counts.values().any(|c| *c != 0) {
        return Err(mismatch());
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nums: &[usize]) -> Vec<ElementId> {
        nums.iter().map(|&n| ElementId::from_index(n)).collect()
    }

    fn id(n: usize) -> ElementId {
        ElementId::from_index(n)
    }

    #[test]
    fn test_identical_short_circuits() {
        let seq = ids(&[0, 1, 2]);
        let d = diff(&seq, &seq).unwrap();
        assert_eq!(d.distance(), 0);
        assert!(!d.has_changes());
        assert_eq!(d.unchanged.len(), 3);
    }

    #[test]
    fn test_empty() {
        let d = diff(&[], &[]).unwrap();
        assert_eq!(d.distance(), 0);
    }

    #[test]
    fn test_single_move() {
        // zeta(0), alpha(1), beta(2) -> alpha, beta, zeta
        let d = diff(&ids(&[0, 1, 2]), &ids(&[1, 2, 0])).unwrap();
        assert_eq!(d.unchanged.as_slice(), &[(0, id(1)), (1, id(2))]);
        assert_eq!(d.removed.as_slice(), &[(0, id(0))]);
        assert_eq!(d.added.as_slice(), &[(2, id(0))]);
        assert_eq!(d.distance(), 2);
    }

    #[test]
    fn test_added_and_removed_hold_same_elements() {
        let d = diff(&ids(&[3, 0, 2, 1, 4]), &ids(&[0, 1, 2, 3, 4])).unwrap();
        let mut removed: Vec<_> = d.removed.iter().map(|(_, e)| *e).collect();
        let mut added: Vec<_> = d.added.iter().map(|(_, e)| *e).collect();
        removed.sort();
        added.sort();
        assert_eq!(removed, added);
        assert_eq!(d.unchanged.len() + d.added.len(), 5);
    }

    #[test]
    fn test_anchor_before() {
        let d = diff(&ids(&[0, 1, 2]), &ids(&[1, 2, 0])).unwrap();
        assert_eq!(d.anchor_before(2), Some(id(2)));
        assert_eq!(d.anchor_before(1), Some(id(1)));
        assert_eq!(d.anchor_before(0), None);
    }

    #[test]
    fn test_removed_position() {
        let d = diff(&ids(&[0, 1, 2]), &ids(&[1, 2, 0])).unwrap();
        assert_eq!(d.removed_position(id(0)), Some(0));
        assert_eq!(d.removed_position(id(1)), None);
    }

    #[test]
    fn test_rejects_non_permutation() {
        let err = diff(&ids(&[0, 1]), &ids(&[0, 2])).unwrap_err();
        assert!(matches!(err, OrderError::NotAPermutation { .. }));

        let err = diff(&ids(&[0, 1]), &ids(&[0])).unwrap_err();
        assert!(matches!(err, OrderError::NotAPermutation { original: 2, target: 1 }));
    }
}
