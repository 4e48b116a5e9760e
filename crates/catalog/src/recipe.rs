use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{DomainError, DomainResult, Entity, IngredientId, ProductId, RecipePlanId};

/// One bill-of-materials line: quantity of an ingredient per produced unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeItem {
    pub ingredient_id: IngredientId,
    pub qty_oz_per_unit: Decimal,
}

impl RecipeItem {
    pub fn new(ingredient_id: IngredientId, qty_oz_per_unit: Decimal) -> DomainResult<Self> {
        if qty_oz_per_unit <= Decimal::ZERO {
            return Err(DomainError::validation(
                "recipe item quantity must be positive",
            ));
        }
        Ok(Self {
            ingredient_id,
            qty_oz_per_unit,
        })
    }
}

/// A dated, versioned bill of materials for a product type.
///
/// Plans are append-only: a new version is registered instead of editing an
/// existing one. The highest version is the plan in effect unless a caller
/// names a specific one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePlan {
    id: RecipePlanId,
    product_id: ProductId,
    version: u32,
    created_at: DateTime<Utc>,
    items: Vec<RecipeItem>,
}

impl RecipePlan {
    pub(crate) fn new(
        id: RecipePlanId,
        product_id: ProductId,
        version: u32,
        created_at: DateTime<Utc>,
        items: Vec<RecipeItem>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "recipe plan needs at least one item",
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if !seen.insert(item.ingredient_id) {
                return Err(DomainError::validation(format!(
                    "ingredient {} appears twice in recipe plan",
                    item.ingredient_id
                )));
            }
        }
        Ok(Self {
            id,
            product_id,
            version,
            created_at,
            items,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[RecipeItem] {
        &self.items
    }

    /// Ingredient ids directly named by this plan (no compound expansion).
    pub fn ingredient_ids(&self) -> impl Iterator<Item = IngredientId> + '_ {
        self.items.iter().map(|i| i.ingredient_id)
    }
}

impl Entity for RecipePlan {
    type Id = RecipePlanId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
