//! The ledger facade: every read/write operation the collaborators call.
//!
//! One `RwLock` guards the whole state. Writers (receive, stage, record,
//! registrations) take the write guard; reads take the read guard. That is
//! the serializable-transaction strategy from the concurrency model: a
//! commit's check-then-act sequence runs entirely under one exclusive guard,
//! so cross-session contention on a lot is settled by lock order, not by
//! per-row checks.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use foodledger_catalog::{Catalog, Material, Product, RecipeItem, RecipePlan};
use foodledger_compliance::{IncompatiblePair, PairSet};
use foodledger_core::{
    BatchId, Clock, DomainError, DomainResult, Entity, IngredientId, LotCode, LotId,
    ManufacturerId, ProductId, RecipePlanId, SessionToken, SupplierId, SystemClock,
};
use foodledger_events::{FormulationAdded, LedgerEvent, LotReceived};
use foodledger_formulations::{EffectiveRange, Formulation, FormulationBook};

use crate::batch::{Consumption, ProductBatch};
use crate::journal::{Journal, JournalEntry};
use crate::lots::{IngredientLot, ReceivedLot};
use crate::recorder::{self, RecordedBatch};
use crate::sequence::{issue_unique, Sequences};
use crate::staging::{StagingBuffer, StagingRequest, DEFAULT_STAGING_TTL};
use crate::trace::{self, TraceFilter, TraceRow};

pub(crate) struct LedgerState {
    pub(crate) catalog: Catalog,
    pub(crate) formulations: FormulationBook,
    pub(crate) pairs: PairSet,
    pub(crate) lots: BTreeMap<LotId, IngredientLot>,
    pub(crate) batches: BTreeMap<BatchId, ProductBatch>,
    pub(crate) consumptions: Vec<Consumption>,
    pub(crate) staging: StagingBuffer,
    pub(crate) journal: Journal,
    pub(crate) sequences: Sequences,
    pub(crate) issued_codes: HashSet<String>,
}

/// The transactional inventory ledger.
pub struct Ledger {
    state: RwLock<LedgerState>,
    clock: Arc<dyn Clock>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_clock_and_staging_ttl(clock, DEFAULT_STAGING_TTL)
    }

    pub fn with_clock_and_staging_ttl(clock: Arc<dyn Clock>, staging_ttl: Duration) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                catalog: Catalog::new(),
                formulations: FormulationBook::new(),
                pairs: PairSet::new(),
                lots: BTreeMap::new(),
                batches: BTreeMap::new(),
                consumptions: Vec::new(),
                staging: StagingBuffer::new(staging_ttl),
                journal: Journal::default(),
                sequences: Sequences::default(),
                issued_codes: HashSet::new(),
            }),
            clock,
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))
    }

    // ------------------------------------------------------------------
    // Catalog registration
    // ------------------------------------------------------------------

    pub fn register_atomic_ingredient(
        &self,
        id: IngredientId,
        name: impl Into<String>,
    ) -> DomainResult<()> {
        self.write()?.catalog.register_atomic_ingredient(id, name)
    }

    /// Register a compound ingredient from (atomic ingredient, quantity)
    /// material lines. Resolution to [`Material`] happens under the lock, so
    /// the atomicity guarantee of the catalog's depth rule holds.
    pub fn register_compound_ingredient(
        &self,
        id: IngredientId,
        name: impl Into<String>,
        materials: &[(IngredientId, Decimal)],
    ) -> DomainResult<()> {
        let mut state = self.write()?;
        let mut resolved = Vec::with_capacity(materials.len());
        for (material_id, qty_oz) in materials {
            let atomic = state.catalog.atomic_ref(*material_id)?;
            resolved.push(Material::new(atomic, *qty_oz)?);
        }
        state.catalog.register_compound_ingredient(id, name, resolved)
    }

    pub fn register_product(&self, product: Product) -> DomainResult<()> {
        self.write()?.catalog.register_product(product)
    }

    pub fn add_recipe_plan(
        &self,
        product_id: ProductId,
        items: Vec<RecipeItem>,
    ) -> DomainResult<RecipePlanId> {
        let now = self.clock.now();
        self.write()?.catalog.add_recipe_plan(product_id, items, now)
    }

    pub fn recipe_plan(&self, id: RecipePlanId) -> DomainResult<RecipePlan> {
        self.read()?
            .catalog
            .plan(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("recipe plan {id}")))
    }

    /// Highest-version plan for a product.
    pub fn latest_recipe_plan(&self, product_id: ProductId) -> DomainResult<RecipePlan> {
        self.read()?
            .catalog
            .latest_plan(product_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::not_found(format!("recipe plan for product {product_id}"))
            })
    }

    pub fn product(&self, id: ProductId) -> DomainResult<Product> {
        self.read()?
            .catalog
            .product(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn add_incompatible_pair(
        &self,
        x: IngredientId,
        y: IngredientId,
    ) -> DomainResult<bool> {
        let pair = IncompatiblePair::new(x, y)?;
        Ok(self.write()?.pairs.insert(pair))
    }

    // ------------------------------------------------------------------
    // Formulation versioning
    // ------------------------------------------------------------------

    pub fn add_formulation(
        &self,
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
        pack_size_oz: Decimal,
        unit_price: Decimal,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> DomainResult<()> {
        let now = self.clock.now();
        let mut state = self.write()?;
        if state.catalog.ingredient(ingredient_id).is_none() {
            return Err(DomainError::not_found(format!(
                "ingredient {ingredient_id}"
            )));
        }
        let formulation = Formulation::new(
            supplier_id,
            ingredient_id,
            pack_size_oz,
            unit_price,
            EffectiveRange::new(from, to)?,
        )?;
        state.formulations.add(formulation)?;
        state
            .journal
            .append(LedgerEvent::FormulationAdded(FormulationAdded {
                supplier_id,
                ingredient_id,
                pack_size_oz,
                unit_price,
                effective_from: from,
                effective_to: to,
                occurred_at: now,
            }));
        Ok(())
    }

    /// The formulation in effect for a supplier+ingredient on a date.
    pub fn formulation_on(
        &self,
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
        date: NaiveDate,
    ) -> DomainResult<Option<Formulation>> {
        Ok(self
            .read()?
            .formulations
            .version_on(supplier_id, ingredient_id, date)
            .cloned())
    }

    // ------------------------------------------------------------------
    // Lot store
    // ------------------------------------------------------------------

    /// Receive a dated ingredient lot. On success the lot's on-hand equals
    /// the received quantity and it carries a freshly generated, globally
    /// unique lot identifier.
    pub fn receive_lot(
        &self,
        ingredient_id: IngredientId,
        supplier_id: SupplierId,
        quantity_oz: Decimal,
        unit_cost: Decimal,
        expiration_date: NaiveDate,
    ) -> DomainResult<ReceivedLot> {
        let now = self.clock.now();
        let mut guard = self.write()?;
        let state = &mut *guard;
        if state.catalog.ingredient(ingredient_id).is_none() {
            return Err(DomainError::not_found(format!(
                "ingredient {ingredient_id}"
            )));
        }

        let sequences = &mut state.sequences;
        let mut seq = 0u64;
        let raw = issue_unique(&mut state.issued_codes, || {
            seq = sequences.next_lot();
            format!("LOT-{ingredient_id}-{seq:06}")
        })?;
        let lot_id = LotId::new(seq);
        let code = LotCode::new(raw)?;

        let lot = IngredientLot::receive(
            lot_id,
            code.clone(),
            ingredient_id,
            supplier_id,
            quantity_oz,
            unit_cost,
            expiration_date,
            now.date_naive(),
        )?;
        state.lots.insert(lot_id, lot);
        state.journal.append(LedgerEvent::LotReceived(LotReceived {
            lot_id,
            code: code.clone(),
            ingredient_id,
            supplier_id,
            quantity_oz,
            unit_cost,
            expiration_date,
            occurred_at: now,
        }));

        tracing::debug!(lot = %code, ingredient = %ingredient_id, "ingredient lot received");
        Ok(ReceivedLot { lot_id, code })
    }

    pub fn lot(&self, id: LotId) -> DomainResult<IngredientLot> {
        self.read()?
            .lots
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("lot {id}")))
    }

    pub fn on_hand(&self, id: LotId) -> DomainResult<Decimal> {
        Ok(self.lot(id)?.on_hand_oz())
    }

    pub fn all_lots(&self) -> DomainResult<Vec<IngredientLot>> {
        Ok(self.read()?.lots.values().cloned().collect())
    }

    /// Unexpired lots of an ingredient with stock, earliest expiration first
    /// (the FEFO order; ties broken by lot id).
    pub fn available_lots(&self, ingredient_id: IngredientId) -> DomainResult<Vec<IngredientLot>> {
        let today = self.clock.today();
        let state = self.read()?;
        let mut lots: Vec<IngredientLot> = state
            .lots
            .values()
            .filter(|lot| {
                lot.ingredient_id() == ingredient_id
                    && lot.on_hand_oz() > Decimal::ZERO
                    && !lot.is_expired(today)
            })
            .cloned()
            .collect();
        lots.sort_by(|a, b| {
            a.expiration_date()
                .cmp(&b.expiration_date())
                .then(a.id().cmp(b.id()))
        });
        Ok(lots)
    }

    /// Lots with stock expiring within `days` of today (today inclusive).
    pub fn lots_expiring_within(&self, days: i64) -> DomainResult<Vec<IngredientLot>> {
        let today = self.clock.today();
        let state = self.read()?;
        let mut lots: Vec<IngredientLot> = state
            .lots
            .values()
            .filter(|lot| {
                let left = (lot.expiration_date() - today).num_days();
                lot.on_hand_oz() > Decimal::ZERO && (0..=days).contains(&left)
            })
            .cloned()
            .collect();
        lots.sort_by_key(|lot| lot.expiration_date());
        Ok(lots)
    }

    // ------------------------------------------------------------------
    // Staging buffer
    // ------------------------------------------------------------------

    pub fn stage_consumption(
        &self,
        token: &SessionToken,
        lot_id: LotId,
        qty_oz: Decimal,
    ) -> DomainResult<()> {
        let now = self.clock.now();
        self.write()?.staging.stage(token, lot_id, qty_oz, now)
    }

    pub fn staged_requests(&self, token: &SessionToken) -> DomainResult<Vec<StagingRequest>> {
        let now = self.clock.now();
        Ok(self.write()?.staging.requests_for(token, now))
    }

    pub fn clear_staging(&self, token: &SessionToken) -> DomainResult<()> {
        self.write()?.staging.clear(token);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Batch recorder
    // ------------------------------------------------------------------

    /// Validate the session's staged requests against every invariant and,
    /// if valid, atomically create the batch, its consumption records, and
    /// the on-hand decrements. All-or-nothing; see [`crate::recorder`].
    pub fn record_batch(
        &self,
        token: &SessionToken,
        product_id: ProductId,
        produced_units: u32,
        manufacturer_id: ManufacturerId,
    ) -> DomainResult<RecordedBatch> {
        let now = self.clock.now();
        let mut state = self.write()?;
        recorder::record(
            &mut state,
            token,
            product_id,
            produced_units,
            manufacturer_id,
            now,
        )
    }

    pub fn batch(&self, id: BatchId) -> DomainResult<ProductBatch> {
        self.read()?
            .batches
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("batch {id}")))
    }

    pub fn consumptions_of(&self, batch_id: BatchId) -> DomainResult<Vec<Consumption>> {
        Ok(self
            .read()?
            .consumptions
            .iter()
            .filter(|c| c.batch_id == batch_id)
            .cloned()
            .collect())
    }

    /// Most recent batches first, at most `limit`.
    pub fn recent_batches(&self, limit: usize) -> DomainResult<Vec<ProductBatch>> {
        Ok(self
            .read()?
            .batches
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    // ------------------------------------------------------------------
    // Compliance engine
    // ------------------------------------------------------------------

    /// Every incompatible pair fully contained in `ingredient_ids`.
    pub fn check_incompatibility(
        &self,
        ingredient_ids: &[IngredientId],
    ) -> DomainResult<Vec<IncompatiblePair>> {
        let set: HashSet<IngredientId> = ingredient_ids.iter().copied().collect();
        Ok(self.read()?.pairs.conflicts_within(&set))
    }

    /// Conflicts between two products' ingredient sets, resolved from each
    /// product's latest recipe-plan version. Only the ingredient ids directly
    /// named by the plans are compared; compound ingredients are not expanded
    /// to their materials.
    pub fn compare_products(
        &self,
        product_a: ProductId,
        product_b: ProductId,
    ) -> DomainResult<Vec<IncompatiblePair>> {
        let state = self.read()?;
        let set_a = Self::latest_plan_ingredients(&state, product_a)?;
        let set_b = Self::latest_plan_ingredients(&state, product_b)?;
        Ok(state.pairs.conflicts_between(&set_a, &set_b))
    }

    fn latest_plan_ingredients(
        state: &LedgerState,
        product_id: ProductId,
    ) -> DomainResult<HashSet<IngredientId>> {
        if state.catalog.product(product_id).is_none() {
            return Err(DomainError::not_found(format!("product {product_id}")));
        }
        let plan = state.catalog.latest_plan(product_id).ok_or_else(|| {
            DomainError::not_found(format!("recipe plan for product {product_id}"))
        })?;
        Ok(plan.ingredient_ids().collect())
    }

    // ------------------------------------------------------------------
    // Traceability
    // ------------------------------------------------------------------

    pub fn trace(&self, filter: &TraceFilter) -> DomainResult<Vec<TraceRow>> {
        let now = self.clock.now();
        trace::trace(&*self.read()?, filter, now)
    }

    // ------------------------------------------------------------------
    // Journal
    // ------------------------------------------------------------------

    pub fn journal_entries(&self) -> DomainResult<Vec<JournalEntry>> {
        Ok(self.read()?.journal.entries().to_vec())
    }
}
