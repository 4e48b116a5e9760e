//! Session-scoped staging buffer.
//!
//! Callers declare intended lot consumptions here before committing a batch.
//! Isolation is purely by session token. Sessions carry a last-touched
//! timestamp and are evicted lazily once they exceed the buffer's TTL — the
//! defined lifecycle is: created on first `stage`, destroyed on commit,
//! explicit `clear`, or TTL expiry.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodledger_core::{DomainError, DomainResult, LotId, SessionToken};

/// Stale sessions are dropped after this long without activity.
pub const DEFAULT_STAGING_TTL: Duration = Duration::hours(24);

/// One proposed (lot, quantity) consumption.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRequest {
    pub lot_id: LotId,
    pub qty_oz: Decimal,
}

#[derive(Debug)]
struct Session {
    requests: Vec<StagingRequest>,
    touched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub(crate) struct StagingBuffer {
    sessions: HashMap<SessionToken, Session>,
    ttl: Duration,
}

impl StagingBuffer {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Append a pending request. No validation beyond `quantity > 0`; the
    /// recorder re-checks everything at commit time.
    pub(crate) fn stage(
        &mut self,
        token: &SessionToken,
        lot_id: LotId,
        qty_oz: Decimal,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if qty_oz <= Decimal::ZERO {
            return Err(DomainError::validation(
                "staged quantity must be positive",
            ));
        }
        self.sweep(now);
        let session = self.sessions.entry(token.clone()).or_insert(Session {
            requests: Vec::new(),
            touched_at: now,
        });
        session.requests.push(StagingRequest { lot_id, qty_oz });
        session.touched_at = now;
        Ok(())
    }

    pub(crate) fn requests_for(
        &mut self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Vec<StagingRequest> {
        self.sweep(now);
        self.sessions
            .get(token)
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    pub(crate) fn clear(&mut self, token: &SessionToken) {
        self.sessions.remove(token);
    }

    /// Drop every session idle longer than the TTL.
    pub(crate) fn sweep(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| now - session.touched_at <= ttl);
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token(s: &str) -> SessionToken {
        SessionToken::new(s).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn stage_rejects_non_positive_quantity() {
        let mut buffer = StagingBuffer::new(DEFAULT_STAGING_TTL);
        let err = buffer
            .stage(&token("S1"), LotId::new(1), Decimal::ZERO, t0())
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn sessions_are_isolated_by_token() {
        let mut buffer = StagingBuffer::new(DEFAULT_STAGING_TTL);
        buffer
            .stage(&token("S1"), LotId::new(1), Decimal::from(600), t0())
            .unwrap();
        buffer
            .stage(&token("S2"), LotId::new(2), Decimal::from(50), t0())
            .unwrap();

        assert_eq!(buffer.requests_for(&token("S1"), t0()).len(), 1);
        assert_eq!(buffer.requests_for(&token("S2"), t0()).len(), 1);

        buffer.clear(&token("S1"));
        assert!(buffer.requests_for(&token("S1"), t0()).is_empty());
        assert_eq!(buffer.requests_for(&token("S2"), t0()).len(), 1);
    }

    #[test]
    fn stale_sessions_are_evicted_after_ttl() {
        let mut buffer = StagingBuffer::new(Duration::hours(1));
        buffer
            .stage(&token("S1"), LotId::new(1), Decimal::from(600), t0())
            .unwrap();

        // Still there one minute before the TTL elapses.
        let almost = t0() + Duration::minutes(59);
        assert_eq!(buffer.requests_for(&token("S1"), almost).len(), 1);

        let expired = t0() + Duration::minutes(61);
        assert!(buffer.requests_for(&token("S1"), expired).is_empty());
        assert_eq!(buffer.session_count(), 0);
    }

    #[test]
    fn staging_again_refreshes_the_idle_clock() {
        let mut buffer = StagingBuffer::new(Duration::hours(1));
        buffer
            .stage(&token("S1"), LotId::new(1), Decimal::from(600), t0())
            .unwrap();
        let half = t0() + Duration::minutes(30);
        buffer
            .stage(&token("S1"), LotId::new(2), Decimal::from(25), half)
            .unwrap();

        // 90 minutes after t0, but only 60 after the last touch.
        let later = t0() + Duration::minutes(90);
        assert_eq!(buffer.requests_for(&token("S1"), later).len(), 2);
    }
}
