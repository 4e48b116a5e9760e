//! Identifier generation.
//!
//! Lot and product-lot codes compose domain content with a monotonically
//! increasing counter, so they are collision-proof by construction (a
//! timestamp+random scheme would not be). The ever-issued set is still
//! consulted with a bounded regenerate-and-retry, so a collision can never
//! surface to a caller as anything but `UniquenessViolation` — and with the
//! counter scheme that bound is unreachable.

use std::collections::HashSet;

use foodledger_core::{DomainError, DomainResult};

const CODE_RETRY_BUDGET: usize = 8;

/// Monotonic counters backing generated identifiers. Never reset, never
/// reused, even after a lot is fully depleted.
#[derive(Debug, Default)]
pub(crate) struct Sequences {
    lot: u64,
    batch: u64,
}

impl Sequences {
    pub(crate) fn next_lot(&mut self) -> u64 {
        self.lot += 1;
        self.lot
    }

    pub(crate) fn next_batch(&mut self) -> u64 {
        self.batch += 1;
        self.batch
    }
}

/// Issue a code produced by `next`, regenerating up to the retry budget if it
/// was ever issued before.
pub(crate) fn issue_unique<F>(issued: &mut HashSet<String>, mut next: F) -> DomainResult<String>
where
    F: FnMut() -> String,
{
    for _ in 0..CODE_RETRY_BUDGET {
        let candidate = next();
        if issued.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }
    Err(DomainError::uniqueness(format!(
        "could not generate a fresh identifier within {CODE_RETRY_BUDGET} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_monotonic_and_independent() {
        let mut seq = Sequences::default();
        assert_eq!(seq.next_lot(), 1);
        assert_eq!(seq.next_lot(), 2);
        assert_eq!(seq.next_batch(), 1);
        assert_eq!(seq.next_lot(), 3);
    }

    #[test]
    fn issue_unique_retries_past_collisions() {
        let mut issued = HashSet::from(["C-1".to_string(), "C-2".to_string()]);
        let mut n = 0;
        let code = issue_unique(&mut issued, || {
            n += 1;
            format!("C-{n}")
        })
        .unwrap();
        assert_eq!(code, "C-3");
    }

    #[test]
    fn issue_unique_gives_up_after_the_budget() {
        let mut issued = HashSet::from(["same".to_string()]);
        let err = issue_unique(&mut issued, || "same".to_string()).unwrap_err();
        match err {
            DomainError::UniquenessViolation(_) => {}
            other => panic!("expected UniquenessViolation error, got {other:?}"),
        }
    }
}
