// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::storage::StoragePort;
use indexmap::IndexSet;
use tracing::{debug, warn};

pub const FAVORITES_KEY: &str = "dashboard_favorites";

/// Starred metric ids, kept in the order they were starred and written
/// through to storage on every change.
#[derive(Debug)]
pub struct FavoritesStore<P: StoragePort> {
    port: P,
    ids: IndexSet<String>,
}

impl<P: StoragePort> FavoritesStore<P> {
    /// Hydrates from storage. Anything unreadable starts an empty set.
    pub fn load(port: P) -> Self {
        let ids = match port.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!(error = %e, "stored favorites are malformed, starting empty");
                    IndexSet::new()
                }
            },
            Ok(None) => IndexSet::new(),
            Err(e) => {
                warn!(error = %e, "favorites storage unreadable, starting empty");
                IndexSet::new()
            }
        };
        debug!(count = ids.len(), "favorites hydrated");
        Self { port, ids }
    }

    /// Adds or removes `id`; returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_favorite = if self.ids.shift_remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist();
        now_favorite
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
    pub fn list(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
    pub fn port(&self) -> &P {
        &self.port
    }

    fn persist(&self) {
        let ids: Vec<&String> = self.ids.iter().collect();
        let result = serde_json::to_string(&ids)
            .map_err(crate::error::StorageError::from)
            .and_then(|json| self.port.set(FAVORITES_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist favorites, keeping them in memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StorageError, StorageResult};
    use crate::storage::MemoryStorage;

    struct BrokenStorage;

    impl StoragePort for BrokenStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Poisoned)
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn test_invalid_json_hydrates_empty() {
        let store = FavoritesStore::load(MemoryStorage::with_entry(FAVORITES_KEY, "{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_wrong_shape_hydrates_empty() {
        let store = FavoritesStore::load(MemoryStorage::with_entry(FAVORITES_KEY, "{\"a\": 1}"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_persists_each_change() {
        let storage = MemoryStorage::new();
        let mut store = FavoritesStore::load(&storage);
        assert!(store.toggle("revenue_trend"));
        assert!(store.toggle("flow_rate"));
        assert_eq!(
            storage.get(FAVORITES_KEY).unwrap().as_deref(),
            Some("[\"revenue_trend\",\"flow_rate\"]")
        );
        assert!(!store.toggle("revenue_trend"));
        assert_eq!(store.list(), vec!["flow_rate".to_string()]);

        let reloaded = FavoritesStore::load(&storage);
        assert_eq!(reloaded.list(), vec!["flow_rate".to_string()]);
    }

    #[test]
    fn test_broken_storage_never_panics() {
        let mut store = FavoritesStore::load(BrokenStorage);
        assert!(store.is_empty());
        assert!(store.toggle("stock_levels"));
        assert!(store.contains("stock_levels"));
    }
}
