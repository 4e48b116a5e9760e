//! Recall traceability.
//!
//! Answers "which product batches used ingredient X or lot Y within N days"
//! by joining batches to their consumption records and consumed lots.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{
    BatchCode, BatchId, DomainError, DomainResult, Entity, IngredientId, LotCode, LotId,
    ManufacturerId, ProductId,
};

use crate::store::LedgerState;

/// Window applied when the caller does not name one.
pub const DEFAULT_TRACE_WINDOW_DAYS: i64 = 20;

/// What to trace. At least one of the two filters must be set; an unfiltered
/// scan over all history is rejected rather than returned unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFilter {
    pub ingredient_id: Option<IngredientId>,
    pub lot_code: Option<LotCode>,
    pub days_window: i64,
}

impl TraceFilter {
    pub fn ingredient(id: IngredientId) -> Self {
        Self {
            ingredient_id: Some(id),
            lot_code: None,
            days_window: DEFAULT_TRACE_WINDOW_DAYS,
        }
    }

    pub fn lot(code: LotCode) -> Self {
        Self {
            ingredient_id: None,
            lot_code: Some(code),
            days_window: DEFAULT_TRACE_WINDOW_DAYS,
        }
    }

    pub fn with_window(mut self, days: i64) -> Self {
        self.days_window = days;
        self
    }

    fn validate(&self) -> DomainResult<()> {
        if self.ingredient_id.is_none() && self.lot_code.is_none() {
            return Err(DomainError::validation(
                "trace needs an ingredient id or a lot identifier",
            ));
        }
        if self.days_window <= 0 {
            return Err(DomainError::validation("trace window must be positive"));
        }
        Ok(())
    }
}

/// One affected batch+lot join row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    pub batch_id: BatchId,
    pub batch_code: BatchCode,
    pub product_id: ProductId,
    pub manufacturer_id: ManufacturerId,
    pub produced_units: u32,
    pub created_at: DateTime<Utc>,
    pub lot_id: LotId,
    pub lot_code: LotCode,
    pub ingredient_id: IngredientId,
    pub lot_expiration: NaiveDate,
    pub consumed_qty_oz: Decimal,
}

/// Newest batches first; ties broken by batch id descending.
pub(crate) fn trace(
    state: &LedgerState,
    filter: &TraceFilter,
    now: DateTime<Utc>,
) -> DomainResult<Vec<TraceRow>> {
    filter.validate()?;
    let horizon = now - Duration::days(filter.days_window);

    let mut rows = Vec::new();
    for consumption in &state.consumptions {
        let Some(batch) = state.batches.get(&consumption.batch_id) else {
            continue;
        };
        if batch.created_at() < horizon {
            continue;
        }
        let Some(lot) = state.lots.get(&consumption.lot_id) else {
            continue;
        };

        let ingredient_hit = filter
            .ingredient_id
            .is_some_and(|id| lot.ingredient_id() == id);
        let lot_hit = filter
            .lot_code
            .as_ref()
            .is_some_and(|code| lot.code() == code);
        if !(ingredient_hit || lot_hit) {
            continue;
        }

        rows.push(TraceRow {
            batch_id: *batch.id(),
            batch_code: batch.code().clone(),
            product_id: batch.product_id(),
            manufacturer_id: batch.manufacturer_id().clone(),
            produced_units: batch.produced_units(),
            created_at: batch.created_at(),
            lot_id: *lot.id(),
            lot_code: lot.code().clone(),
            ingredient_id: lot.ingredient_id(),
            lot_expiration: lot.expiration_date(),
            consumed_qty_oz: consumption.qty_oz,
        });
    }

    rows.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(b.batch_id.cmp(&a.batch_id))
    });
    Ok(rows)
}
