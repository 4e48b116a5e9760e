//! In-memory catalog registry.
//!
//! Owns the reference data the ledger validates against. Registration is
//! append-only; nothing here is deleted once production history may refer to
//! it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use foodledger_core::{DomainError, DomainResult, Entity, IngredientId, ProductId, RecipePlanId};

use crate::ingredient::{AtomicRef, Ingredient, Material};
use crate::product::Product;
use crate::recipe::{RecipeItem, RecipePlan};

#[derive(Debug, Default)]
pub struct Catalog {
    ingredients: HashMap<IngredientId, Ingredient>,
    products: HashMap<ProductId, Product>,
    plans: HashMap<RecipePlanId, RecipePlan>,
    /// Plan ids per product, in registration order (last = latest version).
    plans_by_product: HashMap<ProductId, Vec<RecipePlanId>>,
    next_plan_id: u32,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_atomic_ingredient(
        &mut self,
        id: IngredientId,
        name: impl Into<String>,
    ) -> DomainResult<()> {
        self.insert_ingredient(Ingredient::atomic(id, name)?)
    }

    pub fn register_compound_ingredient(
        &mut self,
        id: IngredientId,
        name: impl Into<String>,
        materials: Vec<Material>,
    ) -> DomainResult<()> {
        self.insert_ingredient(Ingredient::compound(id, name, materials)?)
    }

    fn insert_ingredient(&mut self, ingredient: Ingredient) -> DomainResult<()> {
        let id = *ingredient.id();
        if self.ingredients.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "ingredient {id} already registered"
            )));
        }
        self.ingredients.insert(id, ingredient);
        Ok(())
    }

    /// Issue a material reference for an **atomic** ingredient.
    ///
    /// This is the only door into [`Material`]: a compound id yields
    /// `CompositionDepth`, an unknown id `NotFound`.
    pub fn atomic_ref(&self, id: IngredientId) -> DomainResult<AtomicRef> {
        let ingredient = self
            .ingredients
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("ingredient {id}")))?;
        if ingredient.is_compound() {
            return Err(DomainError::composition_depth(format!(
                "ingredient {id} is compound; materials must be atomic"
            )));
        }
        Ok(AtomicRef::new(id))
    }

    pub fn register_product(&mut self, product: Product) -> DomainResult<()> {
        let id = *product.id();
        if self.products.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "product {id} already registered"
            )));
        }
        self.products.insert(id, product);
        Ok(())
    }

    /// Register a new recipe-plan version for a product.
    ///
    /// Every referenced ingredient must already exist in the catalog.
    pub fn add_recipe_plan(
        &mut self,
        product_id: ProductId,
        items: Vec<RecipeItem>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<RecipePlanId> {
        if !self.products.contains_key(&product_id) {
            return Err(DomainError::not_found(format!("product {product_id}")));
        }
        for item in &items {
            if !self.ingredients.contains_key(&item.ingredient_id) {
                return Err(DomainError::not_found(format!(
                    "ingredient {}",
                    item.ingredient_id
                )));
            }
        }

        self.next_plan_id += 1;
        let id = RecipePlanId::new(self.next_plan_id);
        let versions = self.plans_by_product.entry(product_id).or_default();
        let version = versions.len() as u32 + 1;
        let plan = RecipePlan::new(id, product_id, version, created_at, items)?;
        versions.push(id);
        self.plans.insert(id, plan);
        Ok(id)
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn plan(&self, id: RecipePlanId) -> Option<&RecipePlan> {
        self.plans.get(&id)
    }

    /// Highest-version plan for a product, if any.
    pub fn latest_plan(&self, product_id: ProductId) -> Option<&RecipePlan> {
        self.plans_by_product
            .get(&product_id)
            .and_then(|ids| ids.last())
            .and_then(|id| self.plans.get(id))
    }
}
