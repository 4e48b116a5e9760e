//! Domain events emitted by committed ledger operations.
//!
//! Events are facts: append-only, immutable, and only ever written after the
//! operation they describe has fully committed.

pub mod domain;
pub mod event;

pub use domain::{BatchRecorded, FormulationAdded, LedgerEvent, LotReceived};
pub use event::Event;
