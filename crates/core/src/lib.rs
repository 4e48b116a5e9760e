//! `foodledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    BatchCode, BatchId, IngredientId, LotCode, LotId, ManufacturerId, ProductId, RecipePlanId,
    SessionToken, SupplierId,
};
pub use value_object::ValueObject;
