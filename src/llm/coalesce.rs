//! Single-flight request coalescing: concurrent classifications of the same
//! key share one in-flight model call instead of issuing N identical ones.
//!
//! Each in-flight entry is tagged with a generation. Only the caller that
//! created the entry removes it afterward, and only if the entry still
//! carries that same generation — if a new request already replaced it
//! (because the first was removed and another arrived in the gap), cleanup
//! is a no-op and the newer entry is left alone.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry<T> {
    generation: u64,
    future: Shared<BoxFuture<'static, T>>,
}

pub struct Coalescer<T: Clone + Send + 'static> {
    inflight: Mutex<HashMap<String, Entry<T>>>,
    next_generation: AtomicU64,
}

impl<T: Clone + Send + 'static> Default for Coalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Coalescer<T> {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Run `make` for `key` unless a call for the same key is already in
    /// flight, in which case await its result instead.
    pub async fn run<F>(&self, key: &str, make: F) -> T
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let (shared, generation, is_new) = {
            let mut inflight = self.inflight.lock();
            if let Some(entry) = inflight.get(key) {
                (entry.future.clone(), entry.generation, false)
            } else {
                let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                let shared = make().shared();
                inflight.insert(
                    key.to_string(),
                    Entry {
                        generation,
                        future: shared.clone(),
                    },
                );
                (shared, generation, true)
            }
        };

        let result = shared.await;

        if is_new {
            let mut inflight = self.inflight.lock();
            if inflight.get(key).is_some_and(|entry| entry.generation == generation) {
                inflight.remove(key);
            }
        }

        result
    }

    pub fn inflight_count(&self) -> usize {
        self.inflight.lock().len()
    }
}
