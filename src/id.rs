//! Occurrence-based element identity.
//!
//! An element is identified by where it occurs in the original sequence, never
//! by what it contains. Two textually identical imports at different offsets
//! are different elements:
//!
//! ```text
//! import a from 'a';   // ElementId(0)
//! import a from 'a';   // ElementId(1), same text, distinct identity
//! ```
//!
//! The diff compares `ElementId`s, so reordering only ever moves handles
//! around; the element data stays in the original `Sequence`.

use std::fmt;

// =============================================================================
// ElementId
// =============================================================================

/// Identity handle for one element of a sequence
///
/// The raw value is the element's index in the original (source-order)
/// sequence, which makes `ElementId` usable as a slice index into the
/// per-sequence element data.
///
/// - Copy, no heap allocation
/// - Ordered by source position
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct ElementId(usize);

impl ElementId {
    /// Identity of the element at `index` in its original sequence
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Index of the element in its original sequence
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Identities for a whole sequence of `len` elements, in source order
    pub fn sequence(len: usize) -> Vec<ElementId> {
        (0..len).map(Self::from_index).collect()
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let id = ElementId::from_index(7);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn test_sequence_is_source_order() {
        let ids = ElementId::sequence(3);
        assert_eq!(ids.iter().map(|id| id.index()).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_identity_not_content() {
        // Same content at two positions still yields two identities
        let ids = ElementId::sequence(2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format!("{}", ElementId::from_index(12)), "#12");
        assert_eq!(format!("{:?}", ElementId::from_index(12)), "ElementId(12)");
    }
}
