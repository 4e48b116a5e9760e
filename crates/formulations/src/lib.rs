//! Formulation versioning: per supplier+ingredient priced packaging, valid
//! over a date range.
//!
//! Versioning is append-only. A new version is rejected if its effective
//! range overlaps any existing version for the same supplier+ingredient; no
//! existing version is ever mutated.

pub mod book;
pub mod formulation;

pub use book::FormulationBook;
pub use formulation::{EffectiveRange, Formulation};
