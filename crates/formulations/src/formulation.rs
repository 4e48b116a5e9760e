use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{DomainError, DomainResult, IngredientId, SupplierId, ValueObject};

/// Effective date range; an absent `to` means open-ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl EffectiveRange {
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> DomainResult<Self> {
        if let Some(to) = to {
            if to < from {
                return Err(DomainError::validation(format!(
                    "effective range ends ({to}) before it starts ({from})"
                )));
            }
        }
        Ok(Self { from, to })
    }

    /// Ranges `[from1,to1]` and `[from2,to2]` overlap iff
    /// `!(to1 < from2 || from1 > to2)`, treating an unbounded `to` as +inf.
    pub fn overlaps(&self, other: &EffectiveRange) -> bool {
        let ends_before = match self.to {
            Some(to) => to < other.from,
            None => false,
        };
        let starts_after = match other.to {
            Some(to) => self.from > to,
            None => false,
        };
        !(ends_before || starts_after)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && self.to.is_none_or(|to| date <= to)
    }
}

impl ValueObject for EffectiveRange {}

/// A supplier's dated price/pack-size offer for an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formulation {
    pub supplier_id: SupplierId,
    pub ingredient_id: IngredientId,
    pub pack_size_oz: Decimal,
    pub unit_price: Decimal,
    pub effective: EffectiveRange,
}

impl Formulation {
    pub fn new(
        supplier_id: SupplierId,
        ingredient_id: IngredientId,
        pack_size_oz: Decimal,
        unit_price: Decimal,
        effective: EffectiveRange,
    ) -> DomainResult<Self> {
        if pack_size_oz <= Decimal::ZERO {
            return Err(DomainError::validation("pack size must be positive"));
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::validation("unit price cannot be negative"));
        }
        Ok(Self {
            supplier_id,
            ingredient_id,
            pack_size_oz,
            unit_price,
            effective,
        })
    }
}

impl ValueObject for Formulation {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(from: NaiveDate, to: Option<NaiveDate>) -> EffectiveRange {
        EffectiveRange::new(from, to).unwrap()
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        let a = range(date(2026, 1, 1), Some(date(2026, 3, 31)));
        let b = range(date(2026, 4, 1), Some(date(2026, 6, 30)));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_overlap() {
        // Inclusive bounds: sharing a single day is a conflict.
        let a = range(date(2026, 1, 1), Some(date(2026, 3, 31)));
        let b = range(date(2026, 3, 31), Some(date(2026, 6, 30)));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn open_ended_range_overlaps_everything_after_its_start() {
        let open = range(date(2026, 1, 1), None);
        let later = range(date(2030, 1, 1), Some(date(2030, 12, 31)));
        assert!(open.overlaps(&later));
        assert!(later.overlaps(&open));

        let earlier = range(date(2025, 1, 1), Some(date(2025, 12, 31)));
        assert!(!open.overlaps(&earlier));
    }

    #[test]
    fn range_rejects_end_before_start() {
        let err = EffectiveRange::new(date(2026, 6, 1), Some(date(2026, 1, 1))).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn contains_respects_open_end() {
        let open = range(date(2026, 1, 1), None);
        assert!(open.contains(date(2099, 1, 1)));
        assert!(!open.contains(date(2025, 12, 31)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_date() -> impl Strategy<Value = NaiveDate> {
            (0i64..4000).prop_map(|offset| {
                date(2020, 1, 1) + chrono::Duration::days(offset)
            })
        }

        fn arb_range() -> impl Strategy<Value = EffectiveRange> {
            (arb_date(), proptest::option::of(0i64..800)).prop_map(|(from, span)| {
                let to = span.map(|days| from + chrono::Duration::days(days));
                EffectiveRange::new(from, to).unwrap()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn overlap_is_symmetric(a in arb_range(), b in arb_range()) {
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }

            #[test]
            fn range_overlaps_itself(a in arb_range()) {
                prop_assert!(a.overlaps(&a));
            }
        }
    }
}
