//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! impl_numeric_id {
    ($t:ident, $inner:ty, $name:literal) => {
        #[doc = concat!("Identifier of ", $name, ".")]
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(pub $inner);

        impl $t {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $t {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .parse::<$inner>()
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

macro_rules! impl_string_id {
    ($t:ident, $name:literal) => {
        #[doc = concat!("Identifier of ", $name, ".")]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            /// Create from a non-blank string.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::validation(concat!($name, " cannot be blank")));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

impl_numeric_id!(IngredientId, u32, "an ingredient");
impl_numeric_id!(SupplierId, u32, "a supplier");
impl_numeric_id!(ProductId, u32, "a product type");
impl_numeric_id!(RecipePlanId, u32, "a recipe plan version");
impl_numeric_id!(LotId, u64, "an ingredient lot");
impl_numeric_id!(BatchId, u64, "a product batch");

impl_string_id!(ManufacturerId, "a manufacturer");
impl_string_id!(LotCode, "a generated lot identifier");
impl_string_id!(BatchCode, "a generated product-lot identifier");

/// Caller-supplied opaque staging session token.
///
/// Isolation between staging sessions is purely by token; the ledger never
/// interprets the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::validation("session token cannot be blank"));
        }
        Ok(Self(value))
    }

    /// Generate a fresh token.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing tokens explicitly in tests
    /// for determinism.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_parses_from_string() {
        let id: IngredientId = "101".parse().unwrap();
        assert_eq!(id, IngredientId::new(101));
    }

    #[test]
    fn numeric_id_rejects_garbage() {
        let err = "abc".parse::<LotId>().unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn string_id_rejects_blank() {
        let err = ManufacturerId::new("   ").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn generated_session_tokens_are_distinct() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }
}
