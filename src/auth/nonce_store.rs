//! Login nonce store for replay attack prevention.
//!
//! Each client session owns at most one outstanding nonce. Issuing a new
//! nonce for a session overwrites the previous one, and every read removes
//! the entry, so a nonce can be observed by exactly one sign-in attempt.
//! `DashMap::remove` is atomic per key: two concurrent attempts on the same
//! session can never both obtain the nonce.
//!
//! The number of outstanding sessions is capped. Expired entries are swept
//! only when the cap is reached and by [`NonceStore::purge_expired`], which
//! the server runs on an interval.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No outstanding nonce for this session")]
pub struct NonceNotFound;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Nonce store is full ({capacity} pending sessions)")]
pub struct NonceStoreFull {
    pub capacity: usize,
}

/// A single-use login nonce.
#[derive(Debug, Clone)]
pub struct Nonce {
    value: String,
    issued_at: Instant,
    ttl: Duration,
}

impl Nonce {
    fn fresh(ttl: Duration) -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            issued_at: Instant::now(),
            ttl,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    /// A zero TTL means the nonce is born expired.
    pub fn is_expired(&self) -> bool {
        self.issued_at.elapsed() >= self.ttl
    }
}

/// Thread-safe keyed nonce store.
pub struct NonceStore {
    /// Map from session id to its outstanding nonce
    slots: DashMap<String, Nonce>,
    ttl: Duration,
    capacity: usize,
}

impl NonceStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            slots: DashMap::new(),
            ttl,
            capacity,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Issue a fresh nonce for `session`, invalidating any previous one.
    ///
    /// A new session is refused once `capacity` sessions are pending and
    /// none of them has expired. Re-issuing for a known session always works.
    /// Concurrent issuers may overshoot the cap by a few entries.
    pub fn issue(&self, session: &str) -> Result<Nonce, NonceStoreFull> {
        if self.slots.len() >= self.capacity && !self.slots.contains_key(session) {
            let purged = self.purge_expired();
            if self.slots.len() >= self.capacity {
                return Err(NonceStoreFull {
                    capacity: self.capacity,
                });
            }
            tracing::debug!("[NONCE] store at capacity, purged {} expired", purged);
        }

        let nonce = Nonce::fresh(self.ttl);
        if self
            .slots
            .insert(session.to_string(), nonce.clone())
            .is_some()
        {
            tracing::debug!("[NONCE] replaced outstanding nonce for session {}", session);
        }
        Ok(nonce)
    }

    /// Remove and return the nonce for `session`.
    ///
    /// Fails when none was issued, it was already taken, or it expired.
    /// An expired entry is removed as well.
    pub fn take(&self, session: &str) -> Result<Nonce, NonceNotFound> {
        match self.slots.remove(session) {
            Some((_, nonce)) if !nonce.is_expired() => Ok(nonce),
            _ => Err(NonceNotFound),
        }
    }

    /// Consume the nonce for `session` and report whether it matched `candidate`.
    ///
    /// The slot is empty afterwards regardless of the outcome.
    pub fn verify_and_consume(&self, session: &str, candidate: &str) -> bool {
        self.take(session)
            .map(|nonce| nonce.value == candidate)
            .unwrap_or(false)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, nonce| !nonce.is_expired());
        before.saturating_sub(self.slots.len())
    }

    /// Number of sessions with a stored (possibly expired) nonce.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for NonceStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(100), 10_000)
    }
}
