//! The batch recorder: an ordered validation pipeline followed by a single
//! mutation step.
//!
//! The source-of-truth checks the database scattered across insert triggers;
//! here they run once, in a fixed order, against a snapshot held under the
//! write guard:
//!
//! 1. resolve the product (and its standard batch size)
//! 2. produced units: positive and an integer multiple of the standard size
//! 3. read the session's staged requests (empty staging is rejected)
//! 4. resolve every staged lot; none may be expired at the commit date
//! 5. aggregate demand per lot; none may exceed current on-hand
//! 6. do-not-combine check over the staged lots' ingredient ids
//! 7. cost and expiration arithmetic
//!
//! Only then does the mutation phase run: create the batch row and its
//! consumption records, decrement each lot, journal the event, and clear the
//! session's staging. Every step of that phase is infallible (identifiers
//! are generated before the first write), so no partial state can ever be
//! observed.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{
    BatchCode, BatchId, DomainError, DomainResult, LotId, ManufacturerId, ProductId, SessionToken,
};
use foodledger_events::{BatchRecorded, LedgerEvent};

use crate::batch::{Consumption, ProductBatch};
use crate::sequence::issue_unique;
use crate::store::LedgerState;

/// Commit summary returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedBatch {
    pub batch_id: BatchId,
    pub code: BatchCode,
    pub batch_cost: Decimal,
    pub unit_cost: Decimal,
    pub expiration_date: NaiveDate,
}

/// Fully validated commit plan. Once one exists, applying it cannot fail.
struct BatchPlan {
    product_id: ProductId,
    manufacturer_id: ManufacturerId,
    produced_units: u32,
    /// Aggregated draw per lot, in lot-id order.
    draws: BTreeMap<LotId, Decimal>,
    batch_cost: Decimal,
    unit_cost: Decimal,
    expiration_date: NaiveDate,
}

pub(crate) fn record(
    state: &mut LedgerState,
    token: &SessionToken,
    product_id: ProductId,
    produced_units: u32,
    manufacturer_id: ManufacturerId,
    now: DateTime<Utc>,
) -> DomainResult<RecordedBatch> {
    let plan = prepare(state, token, product_id, produced_units, manufacturer_id, now)?;
    apply(state, plan, token, now)
}

/// Steps 1–7: pure validation against the locked state. No mutation.
fn prepare(
    state: &mut LedgerState,
    token: &SessionToken,
    product_id: ProductId,
    produced_units: u32,
    manufacturer_id: ManufacturerId,
    now: DateTime<Utc>,
) -> DomainResult<BatchPlan> {
    let today = now.date_naive();

    // 1. Resolve the product.
    let product = state
        .catalog
        .product(product_id)
        .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
    if product.manufacturer_id() != &manufacturer_id {
        return Err(DomainError::not_found(format!(
            "product {product_id} for manufacturer {manufacturer_id}"
        )));
    }
    let standard = product.standard_batch_units();

    // 2. Quantity checks.
    if produced_units == 0 {
        return Err(DomainError::validation("produced units must be positive"));
    }
    if produced_units % standard != 0 {
        return Err(DomainError::not_a_multiple(format!(
            "{produced_units} units against a standard batch of {standard}"
        )));
    }

    // 3. Staged requests for this session.
    let requests = state.staging.requests_for(token, now);
    if requests.is_empty() {
        return Err(DomainError::EmptyStaging);
    }

    // 4/5. Resolve lots, reject expired ones, aggregate demand per lot.
    let mut draws: BTreeMap<LotId, Decimal> = BTreeMap::new();
    for request in &requests {
        let lot = state
            .lots
            .get(&request.lot_id)
            .ok_or_else(|| DomainError::not_found(format!("lot {}", request.lot_id)))?;
        if lot.is_expired(today) {
            return Err(DomainError::expired_lot(format!(
                "lot {} expired {}",
                lot.code(),
                lot.expiration_date()
            )));
        }
        *draws.entry(request.lot_id).or_insert(Decimal::ZERO) += request.qty_oz;
    }
    let mut ingredient_ids = HashSet::new();
    for (lot_id, qty) in &draws {
        let lot = state
            .lots
            .get(lot_id)
            .ok_or_else(|| DomainError::not_found(format!("lot {lot_id}")))?;
        lot.check_draw(*qty)?;
        ingredient_ids.insert(lot.ingredient_id());
    }

    // 6. Do-not-combine check over the implied ingredient set.
    let conflicts = state.pairs.conflicts_within(&ingredient_ids);
    if let Some(pair) = conflicts.first() {
        let (a, b) = pair.members();
        return Err(DomainError::incompatible(format!(
            "ingredients {a} and {b} must not share a batch ({} conflict(s) total)",
            conflicts.len()
        )));
    }

    // 7. Costs and expiration.
    let mut batch_cost = Decimal::ZERO;
    let mut expiration: Option<NaiveDate> = None;
    for (lot_id, qty) in &draws {
        let lot = state
            .lots
            .get(lot_id)
            .ok_or_else(|| DomainError::not_found(format!("lot {lot_id}")))?;
        batch_cost += *qty * lot.unit_cost();
        expiration = Some(match expiration {
            Some(current) => current.min(lot.expiration_date()),
            None => lot.expiration_date(),
        });
    }
    let unit_cost = (batch_cost / Decimal::from(produced_units)).round_dp(4);
    let expiration_date = expiration.ok_or(DomainError::EmptyStaging)?;

    Ok(BatchPlan {
        product_id,
        manufacturer_id,
        produced_units,
        draws,
        batch_cost,
        unit_cost,
        expiration_date,
    })
}

/// Step 8: mutation. Identifiers first (the only fallible part), then the
/// writes, all under the caller's write guard.
fn apply(
    state: &mut LedgerState,
    plan: BatchPlan,
    token: &SessionToken,
    now: DateTime<Utc>,
) -> DomainResult<RecordedBatch> {
    let sequences = &mut state.sequences;
    let mut seq = 0u64;
    let raw = issue_unique(&mut state.issued_codes, || {
        seq = sequences.next_batch();
        format!("{}-{}-{:04}", plan.product_id, plan.manufacturer_id, seq)
    })?;
    let batch_id = BatchId::new(seq);
    let code = BatchCode::new(raw)?;

    let batch = ProductBatch::new(
        batch_id,
        code.clone(),
        plan.product_id,
        plan.manufacturer_id.clone(),
        plan.produced_units,
        plan.batch_cost,
        plan.unit_cost,
        plan.expiration_date,
        now,
    );

    let mut consumed = Vec::with_capacity(plan.draws.len());
    for (lot_id, qty) in &plan.draws {
        if let Some(lot) = state.lots.get_mut(lot_id) {
            lot.apply_draw(*qty);
        }
        state.consumptions.push(Consumption {
            batch_id,
            lot_id: *lot_id,
            qty_oz: *qty,
        });
        consumed.push((*lot_id, *qty));
    }

    state.batches.insert(batch_id, batch);
    state.staging.clear(token);
    state.journal.append(LedgerEvent::BatchRecorded(BatchRecorded {
        batch_id,
        code: code.clone(),
        product_id: plan.product_id,
        manufacturer_id: plan.manufacturer_id,
        produced_units: plan.produced_units,
        batch_cost: plan.batch_cost,
        unit_cost: plan.unit_cost,
        consumed,
        occurred_at: now,
    }));

    tracing::info!(
        batch = %code,
        product = %plan.product_id,
        units = plan.produced_units,
        "product batch committed"
    );

    Ok(RecordedBatch {
        batch_id,
        code,
        batch_cost: plan.batch_cost,
        unit_cost: plan.unit_cost,
        expiration_date: plan.expiration_date,
    })
}
