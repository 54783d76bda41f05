// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Id-keyed storage for the objects a device creates.

use crate::error::ResourceError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a panicking thread poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Objects of one kind, keyed by the raw value of their handle.
pub(crate) struct Registry<T> {
    kind: &'static str,
    entries: Mutex<HashMap<usize, Arc<T>>>,
    next_id: AtomicUsize,
}

impl<T> Registry<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        self.kind
    }

    /// Reserves the raw id of the next object.
    pub(crate) fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn insert(&self, id: usize, value: Arc<T>) {
        lock(&self.entries).insert(id, value);
    }

    pub(crate) fn get(&self, id: usize) -> Option<Arc<T>> {
        lock(&self.entries).get(&id).cloned()
    }

    /// Like [`Registry::get`], with a [`ResourceError::NotFound`] for unknown ids.
    pub(crate) fn fetch(&self, id: usize) -> Result<Arc<T>, ResourceError> {
        self.get(id).ok_or(ResourceError::NotFound {
            kind: self.kind,
            id,
        })
    }

    pub(crate) fn remove(&self, id: usize) -> Result<Arc<T>, ResourceError> {
        lock(&self.entries)
            .remove(&id)
            .ok_or(ResourceError::NotFound {
                kind: self.kind,
                id,
            })
    }

    /// Removes every object matching `predicate`.
    pub(crate) fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<Arc<T>> {
        let mut entries = lock(&self.entries);
        let ids: Vec<usize> = entries
            .iter()
            .filter(|(_, value)| predicate(value))
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter()
            .filter_map(|id| entries.remove(&id))
            .collect()
    }

    /// Removes every object.
    pub(crate) fn drain(&self) -> Vec<Arc<T>> {
        lock(&self.entries).drain().map(|(_, value)| value).collect()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_lookups_fail_after_removal() {
        let registry = Registry::new("buffer");
        let first = registry.next_id();
        let second = registry.next_id();
        assert_ne!(first, second);

        registry.insert(first, Arc::new(10u32));
        assert_eq!(registry.get(first).as_deref(), Some(&10));
        assert!(registry.remove(first).is_ok());
        assert!(matches!(
            registry.fetch(first),
            Err(ResourceError::NotFound { kind: "buffer", .. })
        ));
    }

    #[test]
    fn remove_where_keeps_non_matching_entries() {
        let registry = Registry::new("value");
        for value in 0..6u32 {
            let id = registry.next_id();
            registry.insert(id, Arc::new(value));
        }
        let removed = registry.remove_where(|value| value % 2 == 0);
        assert_eq!(removed.len(), 3);
        assert_eq!(registry.len(), 3);
    }
}
