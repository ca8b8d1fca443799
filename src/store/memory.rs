//! In-memory record store.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;
use crate::store::{DataRecord, DataStore};

/// A thread-safe in-memory store.
///
/// Cloning is cheap and every clone sees the same records.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Arc<DashMap<u64, DataRecord>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Create a new empty store. The first record gets id 1.
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore for MemoryStore {
    fn get_data(&self, id: u64) -> Option<DataRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    fn set_data(&self, data: String) -> DataRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = DataRecord { id, data };
        self.records.insert(id, record.clone());
        metrics::record_store_size(self.records.len());
        tracing::debug!(id, "Record stored");
        record
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.get_data(1).is_none());

        let first = store.set_data("alpha".into());
        let second = store.set_data("beta".into());
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        assert_eq!(store.get_data(1).unwrap().data, "alpha");
        assert_eq!(store.get_data(2).unwrap().data, "beta");
        assert!(store.get_data(3).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clones_share_records() {
        let store = MemoryStore::new();
        let other = store.clone();
        let rec = other.set_data("shared".into());
        assert_eq!(store.get_data(rec.id), Some(rec));
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let store = MemoryStore::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.set_data(format!("{t}-{i}")).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&200));
    }
}
