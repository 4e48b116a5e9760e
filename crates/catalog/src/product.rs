use serde::{Deserialize, Serialize};

use foodledger_core::{DomainError, DomainResult, Entity, ManufacturerId, ProductId};

/// A manufacturer's product type.
///
/// `standard_batch_units` is the production granularity: every recorded batch
/// must produce an integer multiple of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    manufacturer_id: ManufacturerId,
    code: String,
    name: String,
    standard_batch_units: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        manufacturer_id: ManufacturerId,
        code: impl Into<String>,
        name: impl Into<String>,
        standard_batch_units: u32,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("product code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if standard_batch_units == 0 {
            return Err(DomainError::validation(
                "standard batch units must be positive",
            ));
        }
        Ok(Self {
            id,
            manufacturer_id,
            code,
            name,
            standard_batch_units,
        })
    }

    pub fn manufacturer_id(&self) -> &ManufacturerId {
        &self.manufacturer_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn standard_batch_units(&self) -> u32 {
        self.standard_batch_units
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
