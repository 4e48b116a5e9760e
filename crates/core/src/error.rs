//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
///
/// Every failure inside a commit aborts the whole operation with one of these
/// variants; callers never see a partial success.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested resource was not found (unknown product/ingredient/lot).
    #[error("not found: {0}")]
    NotFound(String),

    /// A lot was consumed (or staged for consumption) past its expiration.
    #[error("lot expired: {0}")]
    ExpiredLot(String),

    /// A received lot's expiration is too close to the receipt date.
    #[error("expiration too soon: {0}")]
    ExpirationTooSoon(String),

    /// Aggregate staged demand exceeds a lot's current on-hand quantity.
    #[error("insufficient stock: {0}")]
    InsufficientStock(String),

    /// A staged consumption set contains both members of a do-not-combine pair.
    #[error("incompatible ingredients: {0}")]
    IncompatibleIngredients(String),

    /// Two formulations for the same supplier+ingredient have overlapping
    /// effective date ranges.
    #[error("overlapping formulation: {0}")]
    OverlappingFormulation(String),

    /// A compound ingredient referenced another compound (or itself).
    #[error("composition depth exceeded: {0}")]
    CompositionDepth(String),

    /// Produced units are not an integer multiple of the standard batch size.
    #[error("not a multiple of the standard batch size: {0}")]
    NotAMultiple(String),

    /// A commit was attempted with no staged consumption requests.
    #[error("no staged consumption requests for session")]
    EmptyStaging,

    /// An identifier collided even after bounded regeneration.
    ///
    /// Internal retry handles collisions; this surfaces only if the retry
    /// budget is exhausted.
    #[error("identifier uniqueness violated: {0}")]
    UniquenessViolation(String),

    /// A conflict occurred (e.g. poisoned lock, duplicate registration).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn expired_lot(msg: impl Into<String>) -> Self {
        Self::ExpiredLot(msg.into())
    }

    pub fn expiration_too_soon(msg: impl Into<String>) -> Self {
        Self::ExpirationTooSoon(msg.into())
    }

    pub fn insufficient_stock(msg: impl Into<String>) -> Self {
        Self::InsufficientStock(msg.into())
    }

    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::IncompatibleIngredients(msg.into())
    }

    pub fn overlapping(msg: impl Into<String>) -> Self {
        Self::OverlappingFormulation(msg.into())
    }

    pub fn composition_depth(msg: impl Into<String>) -> Self {
        Self::CompositionDepth(msg.into())
    }

    pub fn not_a_multiple(msg: impl Into<String>) -> Self {
        Self::NotAMultiple(msg.into())
    }

    pub fn uniqueness(msg: impl Into<String>) -> Self {
        Self::UniquenessViolation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
