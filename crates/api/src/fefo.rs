//! First-expiring-first-out staging planner.
//!
//! Expands a product's latest recipe plan into total ounce demand for a batch
//! and stages that demand from available lots, earliest expiration first.
//! Planning is advisory: the staged session is still validated in full by the
//! commit, which may reject it if stock moved in between.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{
    DomainError, DomainResult, Entity, IngredientId, LotCode, LotId, ProductId, SessionToken,
};
use foodledger_ledger::Ledger;

/// One staged draw chosen by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAllocation {
    pub ingredient_id: IngredientId,
    pub lot_id: LotId,
    pub lot_code: LotCode,
    pub qty_oz: Decimal,
}

/// Stage everything a batch of `produced_units` needs, FEFO order per
/// ingredient. On any shortfall the session is cleared and nothing stays
/// staged.
pub(crate) fn plan(
    ledger: &Ledger,
    token: &SessionToken,
    product_id: ProductId,
    produced_units: u32,
) -> DomainResult<Vec<StagedAllocation>> {
    if produced_units == 0 {
        return Err(DomainError::validation("produced units must be positive"));
    }
    let recipe = ledger.latest_recipe_plan(product_id)?;
    let units = Decimal::from(produced_units);

    let mut allocations = Vec::new();
    for item in recipe.items() {
        let mut remaining = item.qty_oz_per_unit * units;
        for lot in ledger.available_lots(item.ingredient_id)? {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = remaining.min(lot.on_hand_oz());
            if let Err(err) = ledger.stage_consumption(token, *lot.id(), take) {
                ledger.clear_staging(token)?;
                return Err(err);
            }
            allocations.push(StagedAllocation {
                ingredient_id: item.ingredient_id,
                lot_id: *lot.id(),
                lot_code: lot.code().clone(),
                qty_oz: take,
            });
            remaining -= take;
        }
        if remaining > Decimal::ZERO {
            ledger.clear_staging(token)?;
            return Err(DomainError::insufficient_stock(format!(
                "ingredient {}: {} oz short for {} units",
                item.ingredient_id, remaining, produced_units
            )));
        }
    }

    tracing::debug!(
        product = %product_id,
        units = produced_units,
        lots = allocations.len(),
        "batch demand staged"
    );
    Ok(allocations)
}
