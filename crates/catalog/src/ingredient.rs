use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{DomainError, DomainResult, Entity, IngredientId, ValueObject};

/// Reference to an **atomic** ingredient.
///
/// Only the catalog can issue one (see [`crate::Catalog::atomic_ref`]), and it
/// only does so for ingredients registered as atomic. Compound ingredients
/// list materials through this type, so a compound referencing another
/// compound is unrepresentable rather than merely checked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtomicRef(IngredientId);

impl AtomicRef {
    /// Crate-internal: callers go through the catalog.
    pub(crate) fn new(id: IngredientId) -> Self {
        Self(id)
    }

    pub fn ingredient_id(&self) -> IngredientId {
        self.0
    }
}

/// One material line of a compound ingredient.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub ingredient: AtomicRef,
    pub qty_oz: Decimal,
}

impl Material {
    pub fn new(ingredient: AtomicRef, qty_oz: Decimal) -> DomainResult<Self> {
        if qty_oz <= Decimal::ZERO {
            return Err(DomainError::validation(
                "material quantity must be positive",
            ));
        }
        Ok(Self { ingredient, qty_oz })
    }
}

impl ValueObject for Material {}

/// Ingredient composition: exactly one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    Atomic,
    Compound(Vec<Material>),
}

/// Catalog entry for an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    id: IngredientId,
    name: String,
    composition: Composition,
}

impl Ingredient {
    pub(crate) fn atomic(id: IngredientId, name: impl Into<String>) -> DomainResult<Self> {
        Self::build(id, name.into(), Composition::Atomic)
    }

    pub(crate) fn compound(
        id: IngredientId,
        name: impl Into<String>,
        materials: Vec<Material>,
    ) -> DomainResult<Self> {
        if materials.is_empty() {
            return Err(DomainError::validation(
                "compound ingredient needs at least one material",
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for m in &materials {
            if !seen.insert(m.ingredient.ingredient_id()) {
                return Err(DomainError::validation(format!(
                    "duplicate material ingredient {}",
                    m.ingredient.ingredient_id()
                )));
            }
        }
        Self::build(id, name.into(), Composition::Compound(materials))
    }

    fn build(id: IngredientId, name: String, composition: Composition) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("ingredient name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            composition,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.composition, Composition::Compound(_))
    }
}

impl Entity for Ingredient {
    type Id = IngredientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
