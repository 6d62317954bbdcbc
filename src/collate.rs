//! Case-insensitive, locale-aware string comparison
//!
//! Sorting keys are compared with the root-locale collator (CLDR root, the
//! order `localeCompare` uses without a locale):
//!
//! 1. **Primary**: base letters, accents ignored:
//!    whitespace < punctuation/symbols < digits < letters
//! 2. **Secondary**: accents, so `ecran` < `écran` < `fichier`
//! 3. **Tertiary**: lowercase sorts before uppercase
//! 4. **Code point**: final tie-break so the order is total
//!
//! ```text
//! "@scope/pkg" < "./local" < "écran" < "lodash" < "React" < "react-dom"
//! ```
//!
//! Punctuation follows the collation order rather than ASCII, so `_` and `-`
//! sort before `.` and `/`.

use std::cmp::Ordering;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};

thread_local! {
    static TERTIARY: Option<CollatorBorrowed<'static>> = root_collator(Strength::Tertiary);
    static PRIMARY: Option<CollatorBorrowed<'static>> = root_collator(Strength::Primary);
}

// =============================================================================
// Public API
// =============================================================================

/// Compare two strings with the root collator and a deterministic tie-break.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    TERTIARY
        .with(|collator| collate(collator.as_ref(), a, b))
        .then_with(|| a.cmp(b))
}

/// Primary-level comparison only: equal for strings that differ just in case
/// or accents.
pub fn primary_cmp(a: &str, b: &str) -> Ordering {
    PRIMARY.with(|collator| collate(collator.as_ref(), a, b))
}

// =============================================================================
// Helper Functions
// =============================================================================

fn root_collator(strength: Strength) -> Option<CollatorBorrowed<'static>> {
    let mut options = CollatorOptions::default();
    options.strength = Some(strength);
    match Collator::try_new(CollatorPreferences::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            tracing::warn!(error = %err, "root collator unavailable, comparing by code point");
            None
        }
    }
}

fn collate(collator: Option<&CollatorBorrowed<'static>>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

// =============================================================================
// Tests
// =============================================================================
