//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// An entity keeps its identity while its state changes: an `IngredientLot`
/// is the same lot as its on-hand drains to zero, a `RecipePlan` the same
/// plan version regardless of which product revision supersedes it. Contrast
/// with [`crate::ValueObject`], where only the attribute values matter.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
