//! Read-only roll-ups over the ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{BatchCode, BatchId, DomainResult, Entity, IngredientId, LotCode};
use foodledger_ledger::Ledger;

/// Total on-hand ounces per ingredient, across all of its lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnHandRow {
    pub ingredient_id: IngredientId,
    pub lots: usize,
    pub on_hand_oz: Decimal,
}

/// A stocked lot nearing its expiration date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringLotRow {
    pub lot_code: LotCode,
    pub ingredient_id: IngredientId,
    pub on_hand_oz: Decimal,
    pub expiration_date: NaiveDate,
}

/// Cost figures for one recorded batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCostRow {
    pub batch_id: BatchId,
    pub batch_code: BatchCode,
    pub produced_units: u32,
    pub batch_cost: Decimal,
    pub unit_cost: Decimal,
}

pub(crate) fn on_hand_by_ingredient(ledger: &Ledger) -> DomainResult<Vec<OnHandRow>> {
    let mut totals: BTreeMap<IngredientId, (usize, Decimal)> = BTreeMap::new();
    for lot in ledger.all_lots()? {
        let entry = totals
            .entry(lot.ingredient_id())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += lot.on_hand_oz();
    }
    Ok(totals
        .into_iter()
        .map(|(ingredient_id, (lots, on_hand_oz))| OnHandRow {
            ingredient_id,
            lots,
            on_hand_oz,
        })
        .collect())
}

pub(crate) fn expiring_within(ledger: &Ledger, within_days: i64) -> DomainResult<Vec<ExpiringLotRow>> {
    Ok(ledger
        .lots_expiring_within(within_days)?
        .into_iter()
        .map(|lot| ExpiringLotRow {
            lot_code: lot.code().clone(),
            ingredient_id: lot.ingredient_id(),
            on_hand_oz: lot.on_hand_oz(),
            expiration_date: lot.expiration_date(),
        })
        .collect())
}

pub(crate) fn recent_batch_costs(ledger: &Ledger, limit: usize) -> DomainResult<Vec<BatchCostRow>> {
    Ok(ledger
        .recent_batches(limit)?
        .into_iter()
        .map(|batch| BatchCostRow {
            batch_id: *batch.id(),
            batch_code: batch.code().clone(),
            produced_units: batch.produced_units(),
            batch_cost: batch.batch_cost(),
            unit_cost: batch.unit_cost(),
        })
        .collect())
}
