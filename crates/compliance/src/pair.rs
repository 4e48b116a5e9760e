use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use foodledger_core::{DomainError, DomainResult, IngredientId, ValueObject};

/// An unordered pair of ingredients that must never jointly appear in one
/// product batch.
///
/// Stored canonically: `a < b` always holds, so `(x, y)` and `(y, x)` are the
/// same value.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IncompatiblePair {
    a: IngredientId,
    b: IngredientId,
}

impl IncompatiblePair {
    pub fn new(x: IngredientId, y: IngredientId) -> DomainResult<Self> {
        if x == y {
            return Err(DomainError::validation(format!(
                "ingredient {x} cannot be incompatible with itself"
            )));
        }
        let (a, b) = if x < y { (x, y) } else { (y, x) };
        Ok(Self { a, b })
    }

    pub fn members(&self) -> (IngredientId, IngredientId) {
        (self.a, self.b)
    }

    pub fn involves(&self, id: IngredientId) -> bool {
        self.a == id || self.b == id
    }
}

impl ValueObject for IncompatiblePair {}

/// The global incompatible-pair list.
#[derive(Debug, Default)]
pub struct PairSet {
    pairs: BTreeSet<IncompatiblePair>,
}

impl PairSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; inserting the symmetric twin is a no-op.
    pub fn insert(&mut self, pair: IncompatiblePair) -> bool {
        self.pairs.insert(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every pair whose members are **both** present in `ingredient_ids`.
    pub fn conflicts_within(&self, ingredient_ids: &HashSet<IngredientId>) -> Vec<IncompatiblePair> {
        self.pairs
            .iter()
            .filter(|p| ingredient_ids.contains(&p.a) && ingredient_ids.contains(&p.b))
            .copied()
            .collect()
    }

    /// Every pair with one member in `left` and the other in `right`.
    pub fn conflicts_between(
        &self,
        left: &HashSet<IngredientId>,
        right: &HashSet<IngredientId>,
    ) -> Vec<IncompatiblePair> {
        self.pairs
            .iter()
            .filter(|p| {
                (left.contains(&p.a) && right.contains(&p.b))
                    || (left.contains(&p.b) && right.contains(&p.a))
            })
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> IngredientId {
        IngredientId::new(n)
    }

    fn set(ids: &[u32]) -> HashSet<IngredientId> {
        ids.iter().copied().map(IngredientId::new).collect()
    }

    #[test]
    fn pair_is_canonicalized() {
        let forward = IncompatiblePair::new(id(104), id(201)).unwrap();
        let backward = IncompatiblePair::new(id(201), id(104)).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.members(), (id(104), id(201)));
    }

    #[test]
    fn self_pair_is_rejected() {
        let err = IncompatiblePair::new(id(7), id(7)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn symmetric_insert_is_deduplicated() {
        let mut pairs = PairSet::new();
        assert!(pairs.insert(IncompatiblePair::new(id(1), id(2)).unwrap()));
        assert!(!pairs.insert(IncompatiblePair::new(id(2), id(1)).unwrap()));
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn conflicts_within_needs_both_members() {
        let mut pairs = PairSet::new();
        pairs.insert(IncompatiblePair::new(id(104), id(201)).unwrap());

        assert!(pairs.conflicts_within(&set(&[104])).is_empty());
        assert!(pairs.conflicts_within(&set(&[201, 5])).is_empty());

        let hits = pairs.conflicts_within(&set(&[104, 201, 7]));
        assert_eq!(hits, vec![IncompatiblePair::new(id(104), id(201)).unwrap()]);
    }

    #[test]
    fn conflicts_between_crosses_the_two_sets() {
        let mut pairs = PairSet::new();
        pairs.insert(IncompatiblePair::new(id(104), id(201)).unwrap());
        pairs.insert(IncompatiblePair::new(id(1), id(2)).unwrap());

        // One member per side, either orientation.
        let hits = pairs.conflicts_between(&set(&[104]), &set(&[201]));
        assert_eq!(hits.len(), 1);
        let hits = pairs.conflicts_between(&set(&[201]), &set(&[104]));
        assert_eq!(hits.len(), 1);

        // Both members on the same side do not cross.
        let hits = pairs.conflicts_between(&set(&[104, 201]), &set(&[9]));
        assert!(hits.is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn conflicts_within_ignores_input_order(
                ids in proptest::collection::vec(1u32..50, 0..12),
                pair_seeds in proptest::collection::vec((1u32..50, 1u32..50), 0..8),
            ) {
                let mut pairs = PairSet::new();
                for (x, y) in pair_seeds {
                    if x != y {
                        pairs.insert(IncompatiblePair::new(id(x), id(y)).unwrap());
                    }
                }

                let forward: HashSet<_> = ids.iter().copied().map(IngredientId::new).collect();
                let reversed: HashSet<_> =
                    ids.iter().rev().copied().map(IngredientId::new).collect();

                prop_assert_eq!(
                    pairs.conflicts_within(&forward),
                    pairs.conflicts_within(&reversed)
                );
            }

            #[test]
            fn conflicts_between_is_symmetric(
                left in proptest::collection::hash_set(1u32..50, 0..10),
                right in proptest::collection::hash_set(1u32..50, 0..10),
                pair_seeds in proptest::collection::vec((1u32..50, 1u32..50), 0..8),
            ) {
                let mut pairs = PairSet::new();
                for (x, y) in pair_seeds {
                    if x != y {
                        pairs.insert(IncompatiblePair::new(id(x), id(y)).unwrap());
                    }
                }

                let left: HashSet<_> = left.into_iter().map(IngredientId::new).collect();
                let right: HashSet<_> = right.into_iter().map(IngredientId::new).collect();

                let mut a = pairs.conflicts_between(&left, &right);
                let mut b = pairs.conflicts_between(&right, &left);
                a.sort();
                b.sort();
                prop_assert_eq!(a, b);
            }
        }
    }
}
