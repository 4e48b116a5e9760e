//! Append-only store of formulation versions.

use std::collections::HashMap;

use chrono::NaiveDate;

use foodledger_core::{DomainError, DomainResult, IngredientId, SupplierId};

use crate::formulation::Formulation;

/// Formulation history keyed by supplier+ingredient.
///
/// Versions are never mutated or removed; `add` only appends, and rejects a
/// candidate whose effective range overlaps an existing version for the same
/// key.
#[derive(Debug, Default)]
pub struct FormulationBook {
    versions: HashMap<(SupplierId, IngredientId), Vec<Formulation>>,
}

impl FormulationBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, formulation: Formulation) -> DomainResult<()> {
        let key = (formulation.supplier_id, formulation.ingredient_id);
        let versions = self.versions.entry(key).or_default();

        if let Some(existing) = versions
            .iter()
            .find(|v| v.effective.overlaps(&formulation.effective))
        {
            return Err(DomainError::overlapping(format!(
                "supplier {} ingredient {}: candidate range {:?} overlaps existing {:?}",
                key.0, key.1, formulation.effective, existing.effective
            )));
        }

        versions.push(formulation);
        Ok(())
    }

    /// All versions for a supplier+ingredient, in insertion order.
    pub fn versions(
        &self,
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
    ) -> &[Formulation] {
        self.versions
            .get(&(supplier_id, ingredient_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The version in effect on `date`, if any.
    ///
    /// At most one can match because ranges never overlap.
    pub fn version_on(
        &self,
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
        date: NaiveDate,
    ) -> Option<&Formulation> {
        self.versions(supplier_id, ingredient_id)
            .iter()
            .find(|v| v.effective.contains(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::EffectiveRange;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn formulation(from: NaiveDate, to: Option<NaiveDate>, price: &str) -> Formulation {
        Formulation::new(
            SupplierId::new(21),
            IngredientId::new(101),
            Decimal::from(16),
            price.parse::<Decimal>().unwrap(),
            EffectiveRange::new(from, to).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn non_overlapping_versions_coexist() {
        let mut book = FormulationBook::new();
        book.add(formulation(
            date(2026, 1, 1),
            Some(date(2026, 6, 30)),
            "0.10",
        ))
        .unwrap();
        book.add(formulation(date(2026, 7, 1), None, "0.12")).unwrap();

        assert_eq!(
            book.versions(SupplierId::new(21), IngredientId::new(101))
                .len(),
            2
        );
    }

    #[test]
    fn overlapping_version_is_rejected_and_book_unchanged() {
        let mut book = FormulationBook::new();
        book.add(formulation(date(2026, 1, 1), None, "0.10")).unwrap();

        let err = book
            .add(formulation(
                date(2026, 3, 1),
                Some(date(2026, 4, 1)),
                "0.08",
            ))
            .unwrap_err();
        match err {
            DomainError::OverlappingFormulation(_) => {}
            other => panic!("expected OverlappingFormulation error, got {other:?}"),
        }

        assert_eq!(
            book.versions(SupplierId::new(21), IngredientId::new(101))
                .len(),
            1
        );
    }

    #[test]
    fn same_range_for_different_supplier_is_fine() {
        let mut book = FormulationBook::new();
        book.add(formulation(date(2026, 1, 1), None, "0.10")).unwrap();

        let other_supplier = Formulation::new(
            SupplierId::new(22),
            IngredientId::new(101),
            Decimal::from(16),
            "0.11".parse().unwrap(),
            EffectiveRange::new(date(2026, 1, 1), None).unwrap(),
        )
        .unwrap();
        book.add(other_supplier).unwrap();
    }

    #[test]
    fn version_on_picks_the_range_containing_the_date() {
        let mut book = FormulationBook::new();
        book.add(formulation(
            date(2026, 1, 1),
            Some(date(2026, 6, 30)),
            "0.10",
        ))
        .unwrap();
        book.add(formulation(date(2026, 7, 1), None, "0.12")).unwrap();

        let hit = book
            .version_on(SupplierId::new(21), IngredientId::new(101), date(2026, 8, 1))
            .unwrap();
        assert_eq!(hit.unit_price, "0.12".parse::<Decimal>().unwrap());

        assert!(book
            .version_on(SupplierId::new(21), IngredientId::new(101), date(2025, 1, 1))
            .is_none());
    }
}
