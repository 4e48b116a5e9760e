//! Product batches and their consumption records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{BatchCode, BatchId, Entity, LotId, ManufacturerId, ProductId};

/// A committed production batch. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBatch {
    id: BatchId,
    code: BatchCode,
    product_id: ProductId,
    manufacturer_id: ManufacturerId,
    produced_units: u32,
    batch_cost: Decimal,
    unit_cost: Decimal,
    /// Earliest expiration among the consumed lots.
    expiration_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl ProductBatch {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: BatchId,
        code: BatchCode,
        product_id: ProductId,
        manufacturer_id: ManufacturerId,
        produced_units: u32,
        batch_cost: Decimal,
        unit_cost: Decimal,
        expiration_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            product_id,
            manufacturer_id,
            produced_units,
            batch_cost,
            unit_cost,
            expiration_date,
            created_at,
        }
    }

    pub fn code(&self) -> &BatchCode {
        &self.code
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn manufacturer_id(&self) -> &ManufacturerId {
        &self.manufacturer_id
    }

    pub fn produced_units(&self) -> u32 {
        self.produced_units
    }

    pub fn batch_cost(&self) -> Decimal {
        self.batch_cost
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for ProductBatch {
    type Id = BatchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Append-only link between a product batch and a consumed ingredient lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    pub batch_id: BatchId,
    pub lot_id: LotId,
    pub qty_oz: Decimal,
}
