//! Process-wide memoization cache.
//!
//! Some values need an expensive or interactive step to obtain (resolving a
//! binary, asking for a path) and never change during a run. `MemoCache` keeps
//! them for the lifetime of the process. One instance is built in `main` and
//! shared with whatever needs it; nothing else evicts entries.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Entry = Arc<dyn Any + Send + Sync>;

/// Cache keyed by a scope (the operation being memoized) plus an argument key.
#[derive(Default)]
pub struct MemoCache {
    entries: Mutex<HashMap<(&'static str, String), Entry>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `(scope, key)`, computing it with `f` on a miss.
    ///
    /// Errors from `f` are returned without being cached, so a later call retries.
    /// A value cached under the same key with a different type is treated as a miss
    /// and replaced.
    pub fn get_or_try_insert_with<T, E, F>(
        &self,
        scope: &'static str,
        key: impl Into<String>,
        f: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let key = (scope, key.into());

        if let Some(value) = self
            .lock()
            .get(&key)
            .and_then(|entry| entry.downcast_ref::<T>())
        {
            return Ok(value.clone());
        }

        // Computed without holding the lock; `f` may itself consult the cache.
        let value = f()?;
        self.lock().insert(key, Arc::new(value.clone()));
        Ok(value)
    }

    /// Infallible form of [`MemoCache::get_or_try_insert_with`].
    pub fn get_or_insert_with<T, F>(&self, scope: &'static str, key: impl Into<String>, f: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        match self.get_or_try_insert_with::<T, std::convert::Infallible, _>(scope, key, || Ok(f()))
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(&'static str, String), Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
