//! `workmatch-matching` — shared approximate string matching.
//!
//! One implementation of the similarity scoring and the tiered fuzzy-match
//! policy, shared by every search domain instead of copied per domain.

pub mod fuzzy;
pub mod similarity;

pub use fuzzy::{contains_normalized, is_match, matches_any};
pub use similarity::similarity;
