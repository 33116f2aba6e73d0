//! Fuzzy name search.

pub mod fuzzy;

pub use fuzzy::{FuzzySearcher, SearchHit};
