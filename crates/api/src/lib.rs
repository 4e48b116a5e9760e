//! Application facade over the ledger: one service type exposing every
//! supply-chain operation, plus the planning and reporting helpers built on
//! top of it.

pub mod fefo;
pub mod reports;
pub mod service;

pub use fefo::StagedAllocation;
pub use reports::{BatchCostRow, ExpiringLotRow, OnHandRow};
pub use service::{SupplyChainService, TraceReport};
