//! Catalog domain module: ingredients, product types, and versioned recipe
//! plans.
//!
//! Mostly static reference data. Composition depth is limited to one level
//! **by construction**: a compound ingredient's materials are [`AtomicRef`]s,
//! which the catalog only issues for atomic ingredients.

pub mod ingredient;
pub mod product;
pub mod recipe;
pub mod registry;

pub use ingredient::{AtomicRef, Composition, Ingredient, Material};
pub use product::Product;
pub use recipe::{RecipeItem, RecipePlan};
pub use registry::Catalog;
