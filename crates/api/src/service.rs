//! The supply-chain service facade.
//!
//! Thin, synchronous delegation onto [`Ledger`]; callers hold one service
//! (cheaply cloneable) and never touch the ledger's lock discipline directly.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_catalog::{Product, RecipeItem, RecipePlan};
use foodledger_compliance::IncompatiblePair;
use foodledger_core::{
    BatchId, Clock, DomainResult, IngredientId, LotId, ManufacturerId, ProductId, RecipePlanId,
    SessionToken, SupplierId,
};
use foodledger_formulations::Formulation;
use foodledger_ledger::{
    Consumption, IngredientLot, JournalEntry, Ledger, ProductBatch, ReceivedLot, RecordedBatch,
    StagingRequest, TraceFilter, TraceRow,
};

use crate::fefo::{self, StagedAllocation};
use crate::reports::{self, BatchCostRow, ExpiringLotRow, OnHandRow};

/// Recall report: the matching batch+lot rows plus roll-up figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceReport {
    pub rows: Vec<TraceRow>,
    /// Distinct batches touched by the recall scope.
    pub affected_batches: usize,
    /// Produced units summed over those distinct batches.
    pub total_units: u64,
}

#[derive(Clone)]
pub struct SupplyChainService {
    ledger: Arc<Ledger>,
}

impl Default for SupplyChainService {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplyChainService {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(Ledger::new()),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Arc::new(Ledger::with_clock(clock)),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // --- catalog ---

    pub fn register_atomic_ingredient(
        &self,
        id: IngredientId,
        name: impl Into<String>,
    ) -> DomainResult<()> {
        self.ledger.register_atomic_ingredient(id, name)
    }

    pub fn register_compound_ingredient(
        &self,
        id: IngredientId,
        name: impl Into<String>,
        materials: &[(IngredientId, Decimal)],
    ) -> DomainResult<()> {
        self.ledger.register_compound_ingredient(id, name, materials)
    }

    pub fn register_product(&self, product: Product) -> DomainResult<()> {
        self.ledger.register_product(product)
    }

    pub fn add_recipe_plan(
        &self,
        product_id: ProductId,
        items: Vec<RecipeItem>,
    ) -> DomainResult<RecipePlanId> {
        self.ledger.add_recipe_plan(product_id, items)
    }

    pub fn recipe_plan(&self, id: RecipePlanId) -> DomainResult<RecipePlan> {
        self.ledger.recipe_plan(id)
    }

    // --- formulations ---

    pub fn add_formulation(
        &self,
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
        pack_size_oz: Decimal,
        unit_price: Decimal,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> DomainResult<()> {
        self.ledger
            .add_formulation(supplier_id, ingredient_id, pack_size_oz, unit_price, from, to)
    }

    pub fn formulation_on(
        &self,
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
        date: NaiveDate,
    ) -> DomainResult<Option<Formulation>> {
        self.ledger.formulation_on(supplier_id, ingredient_id, date)
    }

    // --- lots ---

    pub fn receive_lot(
        &self,
        ingredient_id: IngredientId,
        supplier_id: SupplierId,
        quantity_oz: Decimal,
        unit_cost: Decimal,
        expiration_date: NaiveDate,
    ) -> DomainResult<ReceivedLot> {
        self.ledger
            .receive_lot(ingredient_id, supplier_id, quantity_oz, unit_cost, expiration_date)
    }

    pub fn lot(&self, id: LotId) -> DomainResult<IngredientLot> {
        self.ledger.lot(id)
    }

    pub fn available_lots(&self, ingredient_id: IngredientId) -> DomainResult<Vec<IngredientLot>> {
        self.ledger.available_lots(ingredient_id)
    }

    // --- staging and recording ---

    pub fn stage_consumption(
        &self,
        token: &SessionToken,
        lot_id: LotId,
        qty_oz: Decimal,
    ) -> DomainResult<()> {
        self.ledger.stage_consumption(token, lot_id, qty_oz)
    }

    pub fn staged_requests(&self, token: &SessionToken) -> DomainResult<Vec<StagingRequest>> {
        self.ledger.staged_requests(token)
    }

    pub fn clear_staging(&self, token: &SessionToken) -> DomainResult<()> {
        self.ledger.clear_staging(token)
    }

    /// Stage a full batch's demand FEFO-style from available lots.
    pub fn plan_fefo(
        &self,
        token: &SessionToken,
        product_id: ProductId,
        produced_units: u32,
    ) -> DomainResult<Vec<StagedAllocation>> {
        fefo::plan(&self.ledger, token, product_id, produced_units)
    }

    pub fn record_batch(
        &self,
        token: &SessionToken,
        product_id: ProductId,
        produced_units: u32,
        manufacturer_id: ManufacturerId,
    ) -> DomainResult<RecordedBatch> {
        self.ledger
            .record_batch(token, product_id, produced_units, manufacturer_id)
    }

    pub fn batch(&self, id: BatchId) -> DomainResult<ProductBatch> {
        self.ledger.batch(id)
    }

    pub fn consumptions_of(&self, batch_id: BatchId) -> DomainResult<Vec<Consumption>> {
        self.ledger.consumptions_of(batch_id)
    }

    // --- compliance ---

    pub fn add_incompatible_pair(
        &self,
        x: IngredientId,
        y: IngredientId,
    ) -> DomainResult<bool> {
        self.ledger.add_incompatible_pair(x, y)
    }

    pub fn check_incompatibility(
        &self,
        ingredient_ids: &[IngredientId],
    ) -> DomainResult<Vec<IncompatiblePair>> {
        self.ledger.check_incompatibility(ingredient_ids)
    }

    pub fn compare_products(
        &self,
        product_a: ProductId,
        product_b: ProductId,
    ) -> DomainResult<Vec<IncompatiblePair>> {
        self.ledger.compare_products(product_a, product_b)
    }

    // --- traceability ---

    pub fn trace_recall(&self, filter: &TraceFilter) -> DomainResult<TraceReport> {
        let rows = self.ledger.trace(filter)?;
        let mut seen: HashSet<BatchId> = HashSet::new();
        let total_units: u64 = rows
            .iter()
            .filter(|r| seen.insert(r.batch_id))
            .map(|r| u64::from(r.produced_units))
            .sum();
        Ok(TraceReport {
            affected_batches: seen.len(),
            total_units,
            rows,
        })
    }

    // --- reports ---

    pub fn on_hand_report(&self) -> DomainResult<Vec<OnHandRow>> {
        reports::on_hand_by_ingredient(&self.ledger)
    }

    pub fn expiring_report(&self, within_days: i64) -> DomainResult<Vec<ExpiringLotRow>> {
        reports::expiring_within(&self.ledger, within_days)
    }

    pub fn batch_cost_report(&self, limit: usize) -> DomainResult<Vec<BatchCostRow>> {
        reports::recent_batch_costs(&self.ledger, limit)
    }

    pub fn journal_entries(&self) -> DomainResult<Vec<JournalEntry>> {
        self.ledger.journal_entries()
    }
}
