//! Do-not-combine compliance checks.
//!
//! A global list of unordered ingredient pairs that must never co-occur in a
//! single product batch. Pairs are normalized on construction (smaller id
//! first), so symmetric duplicates cannot exist.

pub mod pair;

pub use pair::{IncompatiblePair, PairSet};
