//! `foodledger-ledger` — the transactional inventory ledger and
//! production-batch recording engine.
//!
//! The whole ledger state sits behind a single [`std::sync::RwLock`]. A
//! commit ([`Ledger::record_batch`]) holds the write guard for its entire
//! check-then-act sequence, so concurrent commits can never both pass the
//! stock check against the same reported on-hand value. All effects of a
//! commit become visible together, or not at all: validation builds a plan
//! first, and mutation only starts once the plan is complete.

pub mod batch;
pub mod journal;
pub mod lots;
pub mod recorder;
pub mod sequence;
pub mod staging;
pub mod store;
pub mod trace;


pub use batch::{Consumption, ProductBatch};
pub use journal::{Journal, JournalEntry};
pub use lots::{IngredientLot, ReceivedLot, MIN_SHELF_LIFE_DAYS};
pub use recorder::RecordedBatch;
pub use staging::{StagingRequest, DEFAULT_STAGING_TTL};
pub use store::Ledger;
pub use trace::{TraceFilter, TraceRow, DEFAULT_TRACE_WINDOW_DAYS};
