//! Superseded-request detection
//!
//! A client that changes its filters quickly can have several fetches of the
//! same view in flight. Each fetch takes a [`Generation`] for its view key;
//! when it finishes, only the newest generation for that key may publish its
//! result. Older ones are reported as superseded instead of overwriting a
//! newer ledger with a stale one.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

/// Ticket issued to one in-flight request for a view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Generation {
    key: String,
    number: u64,
}

impl Generation {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.number)
    }
}

/// Latest generation per view key
#[derive(Debug, Default)]
pub struct RequestGenerations {
    latest: Mutex<HashMap<String, u64>>,
    counter: AtomicU64,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new generation for `key`, superseding any earlier one
    pub fn begin(&self, key: impl Into<String>) -> Generation {
        let key = key.into();
        let number = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().insert(key.clone(), number);
        Generation { key, number }
    }

    /// Like [`begin`](Self::begin), but releases the key if the returned
    /// guard is dropped without being finished
    pub fn track(&self, key: impl Into<String>) -> InFlight<'_> {
        InFlight {
            generations: self,
            generation: Some(self.begin(key)),
        }
    }

    /// Returns true if no newer generation has been issued for the same key
    pub fn is_current(&self, generation: &Generation) -> bool {
        self.lock().get(&generation.key) == Some(&generation.number)
    }

    /// Releases the key if `generation` is still the newest one
    ///
    /// Returns whether the generation was current.
    pub fn finish(&self, generation: &Generation) -> bool {
        let mut latest = self.lock();
        let current = latest.get(&generation.key) == Some(&generation.number);
        if current {
            latest.remove(&generation.key);
        } else {
            debug!(generation = %generation, "request superseded");
        }
        current
    }

    /// Releases the key without reporting, for requests that never completed
    pub fn abandon(&self, generation: &Generation) {
        let mut latest = self.lock();
        if latest.get(&generation.key) == Some(&generation.number) {
            latest.remove(&generation.key);
        }
    }

    /// Number of keys with a request in flight
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    // The map only holds plain integers, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A generation held by a running request
///
/// Dropping it unfinished (a cancelled request future) abandons the key.
#[derive(Debug)]
pub struct InFlight<'a> {
    generations: &'a RequestGenerations,
    generation: Option<Generation>,
}

impl InFlight<'_> {
    pub fn key(&self) -> &str {
        self.generation.as_ref().map_or("", Generation::key)
    }

    /// See [`RequestGenerations::finish`]
    pub fn finish(mut self) -> bool {
        match self.generation.take() {
            Some(generation) => self.generations.finish(&generation),
            None => false,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(generation) = self.generation.take() {
            self.generations.abandon(&generation);
        }
    }
}
