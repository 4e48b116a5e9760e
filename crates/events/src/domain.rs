//! Concrete ledger events.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{
    BatchCode, BatchId, IngredientId, LotCode, LotId, ManufacturerId, ProductId, SupplierId,
};

use crate::event::Event;

/// Event: an ingredient lot entered the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotReceived {
    pub lot_id: LotId,
    pub code: LotCode,
    pub ingredient_id: IngredientId,
    pub supplier_id: SupplierId,
    pub quantity_oz: Decimal,
    pub unit_cost: Decimal,
    pub expiration_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a priced-packaging version was added for a supplier+ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulationAdded {
    pub supplier_id: SupplierId,
    pub ingredient_id: IngredientId,
    pub pack_size_oz: Decimal,
    pub unit_price: Decimal,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a production batch committed, consuming the listed lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecorded {
    pub batch_id: BatchId,
    pub code: BatchCode,
    pub product_id: ProductId,
    pub manufacturer_id: ManufacturerId,
    pub produced_units: u32,
    pub batch_cost: Decimal,
    pub unit_cost: Decimal,
    /// (lot, quantity drawn) per consumption record, aggregated per lot.
    pub consumed: Vec<(LotId, Decimal)>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    LotReceived(LotReceived),
    FormulationAdded(FormulationAdded),
    BatchRecorded(BatchRecorded),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::LotReceived(_) => "lots.lot.received",
            LedgerEvent::FormulationAdded(_) => "formulations.version.added",
            LedgerEvent::BatchRecorded(_) => "production.batch.recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::LotReceived(e) => e.occurred_at,
            LedgerEvent::FormulationAdded(e) => e.occurred_at,
            LedgerEvent::BatchRecorded(e) => e.occurred_at,
        }
    }
}
