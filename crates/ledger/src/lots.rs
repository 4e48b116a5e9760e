//! Ingredient lot rows.
//!
//! A lot is created once on receipt and never deleted; consumption only
//! decrements `on_hand_oz`, and the row persists at zero for traceability.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{
    DomainError, DomainResult, Entity, IngredientId, LotCode, LotId, SupplierId,
};

/// A received lot must have at least this much shelf life left.
pub const MIN_SHELF_LIFE_DAYS: i64 = 90;

/// A dated, uniquely identified quantity of one ingredient from one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLot {
    id: LotId,
    code: LotCode,
    ingredient_id: IngredientId,
    supplier_id: SupplierId,
    received_qty_oz: Decimal,
    on_hand_oz: Decimal,
    unit_cost: Decimal,
    expiration_date: NaiveDate,
    received_on: NaiveDate,
}

/// What `receive_lot` hands back to the supplier-facing caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedLot {
    pub lot_id: LotId,
    pub code: LotCode,
}

impl IngredientLot {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn receive(
        id: LotId,
        code: LotCode,
        ingredient_id: IngredientId,
        supplier_id: SupplierId,
        quantity_oz: Decimal,
        unit_cost: Decimal,
        expiration_date: NaiveDate,
        received_on: NaiveDate,
    ) -> DomainResult<Self> {
        if quantity_oz <= Decimal::ZERO {
            return Err(DomainError::validation(
                "received quantity must be positive",
            ));
        }
        if unit_cost < Decimal::ZERO {
            return Err(DomainError::validation("unit cost cannot be negative"));
        }
        let shelf_life = (expiration_date - received_on).num_days();
        if shelf_life < MIN_SHELF_LIFE_DAYS {
            return Err(DomainError::expiration_too_soon(format!(
                "lot expires {expiration_date}, only {shelf_life} days after receipt \
                 (minimum {MIN_SHELF_LIFE_DAYS})"
            )));
        }
        Ok(Self {
            id,
            code,
            ingredient_id,
            supplier_id,
            received_qty_oz: quantity_oz,
            on_hand_oz: quantity_oz,
            unit_cost,
            expiration_date,
            received_on,
        })
    }

    pub fn code(&self) -> &LotCode {
        &self.code
    }

    pub fn ingredient_id(&self) -> IngredientId {
        self.ingredient_id
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn received_qty_oz(&self) -> Decimal {
        self.received_qty_oz
    }

    pub fn on_hand_oz(&self) -> Decimal {
        self.on_hand_oz
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn received_on(&self) -> NaiveDate {
        self.received_on
    }

    pub fn is_expired(&self, on: NaiveDate) -> bool {
        self.expiration_date < on
    }

    /// Check that `qty_oz` can be drawn without going negative.
    pub(crate) fn check_draw(&self, qty_oz: Decimal) -> DomainResult<()> {
        if qty_oz <= Decimal::ZERO {
            return Err(DomainError::validation(
                "consumed quantity must be positive",
            ));
        }
        if qty_oz > self.on_hand_oz {
            return Err(DomainError::insufficient_stock(format!(
                "lot {}: requested {} oz, on hand {} oz",
                self.code, qty_oz, self.on_hand_oz
            )));
        }
        Ok(())
    }

    /// Apply a draw that `check_draw` already admitted under the same write
    /// guard. Infallible so the commit's mutation phase cannot abort halfway.
    pub(crate) fn apply_draw(&mut self, qty_oz: Decimal) {
        debug_assert!(qty_oz > Decimal::ZERO && qty_oz <= self.on_hand_oz);
        self.on_hand_oz -= qty_oz;
    }
}

impl Entity for IngredientLot {
    type Id = LotId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
