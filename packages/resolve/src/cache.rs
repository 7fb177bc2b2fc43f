//! Per-evaluation memoization with in-flight coalescing.
//!
//! The cache guarantees two things within one evaluation: a key resolved
//! once never changes value (repeated reads are byte-identical), and a key
//! requested while its first resolution is still in flight shares that
//! resolution instead of issuing a second upstream round trip. Transient
//! failures are never stored, so a later retry within the same evaluation
//! can succeed once the network recovers.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use tracing::debug;

use crate::error::ResolveError;
use crate::types::{Block, DataItem, Transaction};

/// The object kinds a cache key may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Block,
    Transaction,
    DataItem,
}

/// A resolved object as stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedObject {
    Block(Block),
    Transaction(Transaction),
    DataItem(DataItem),
}

/// Outcome of a resolution: the object, an authoritative absence, or a
/// (non-cached) failure.
pub type Resolution = Result<Option<CachedObject>, ResolveError>;

/// Shared completion signal for one in-flight resolution.
struct Flight {
    outcome: Mutex<Option<Resolution>>,
    ready: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, outcome: Resolution) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(outcome);
            self.ready.notify_all();
        }
    }

    fn wait(&self) -> Resolution {
        let mut slot = self.outcome.lock().map_err(|e| ResolveError::Cache {
            message: format!("flight lock poisoned: {}", e),
        })?;
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            slot = self.ready.wait(slot).map_err(|e| ResolveError::Cache {
                message: format!("flight lock poisoned: {}", e),
            })?;
        }
    }
}

enum Entry {
    Ready(Option<CachedObject>),
    InFlight(Arc<Flight>),
}

/// Memoization table owned by one [`crate::EvaluationContext`].
#[derive(Default)]
pub struct EvaluationCache {
    entries: Mutex<HashMap<(ObjectKind, String), Entry>>,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `(kind, id)`, resolving it with
    /// `resolve` on first request. Duplicate requests issued while the first
    /// is in flight wait for and share its outcome.
    pub fn get_or_resolve<F>(&self, kind: ObjectKind, id: &str, resolve: F) -> Resolution
    where
        F: FnOnce() -> Resolution,
    {
        let key = (kind, id.to_string());

        let joined = {
            let mut entries = self.entries.lock().map_err(|e| ResolveError::Cache {
                message: format!("cache lock poisoned: {}", e),
            })?;
            match entries.get(&key) {
                Some(Entry::Ready(stored)) => {
                    debug!(?kind, id, "cache hit");
                    return Ok(stored.clone());
                }
                Some(Entry::InFlight(flight)) => {
                    debug!(?kind, id, "joining in-flight resolution");
                    Some(Arc::clone(flight))
                }
                None => {
                    entries.insert(key.clone(), Entry::InFlight(Arc::new(Flight::new())));
                    None
                }
            }
        };

        if let Some(flight) = joined {
            return flight.wait();
        }

        let outcome = resolve();

        {
            let mut entries = self.entries.lock().map_err(|e| ResolveError::Cache {
                message: format!("cache lock poisoned: {}", e),
            })?;
            let flight = match entries.get(&key) {
                Some(Entry::InFlight(flight)) => Some(Arc::clone(flight)),
                _ => None,
            };
            match &outcome {
                Ok(stored) => {
                    entries.insert(key, Entry::Ready(stored.clone()));
                }
                Err(_) => {
                    // Transient failure: leave the key unresolved so a later
                    // call within this evaluation may retry.
                    entries.remove(&key);
                }
            }
            if let Some(flight) = flight {
                flight.publish(outcome.clone());
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use crate::types::Block;

    fn block(height: u64) -> CachedObject {
        CachedObject::Block(Block {
            indep_hash: format!("hash-{}", height),
            height,
            txs: vec![],
        })
    }

    #[test]
    fn second_call_skips_resolver() {
        let cache = EvaluationCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let outcome = cache
                .get_or_resolve(ObjectKind::Block, "7", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(block(7)))
                })
                .unwrap();
            assert_eq!(outcome, Some(block(7)));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn not_found_is_cached() {
        let cache = EvaluationCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let outcome = cache
                .get_or_resolve(ObjectKind::Transaction, "missing", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .unwrap();
            assert!(outcome.is_none());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transient_failure_is_retried() {
        let cache = EvaluationCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_resolve(ObjectKind::Block, "7", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ResolveError::Cache {
                message: "transient".to_string(),
            })
        });
        assert!(first.is_err());

        let second = cache
            .get_or_resolve(ObjectKind::Block, "7", || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Some(block(7)))
            })
            .unwrap();
        assert_eq!(second, Some(block(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn kinds_do_not_collide() {
        let cache = EvaluationCache::new();

        cache
            .get_or_resolve(ObjectKind::Block, "x", || Ok(Some(block(1))))
            .unwrap();
        let tx_outcome = cache
            .get_or_resolve(ObjectKind::Transaction, "x", || Ok(None))
            .unwrap();

        assert!(tx_outcome.is_none());
    }

    #[test]
    fn duplicate_in_flight_request_shares_outcome() {
        let cache = Arc::new(EvaluationCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let slow_cache = Arc::clone(&cache);
        let slow_calls = Arc::clone(&calls);
        let slow = thread::spawn(move || {
            slow_cache.get_or_resolve(ObjectKind::Block, "9", || {
                slow_calls.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(100));
                Ok(Some(block(9)))
            })
        });

        // Give the first request time to install its in-flight marker.
        thread::sleep(Duration::from_millis(20));

        let fast_calls = Arc::clone(&calls);
        let fast = cache.get_or_resolve(ObjectKind::Block, "9", || {
            fast_calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });

        assert_eq!(fast.unwrap(), Some(block(9)));
        assert_eq!(slow.join().unwrap().unwrap(), Some(block(9)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
