//! Data store subsystem.
//!
//! # Data Flow
//! ```text
//! Controller action
//!     → DataStore trait (get_data / set_data)
//!     → memory.rs (DashMap + atomic id counter)
//! ```
//!
//! # Design Decisions
//! - One store per process, shared by every worker via `Arc`
//! - Ids are allocated from a single counter, so they are unique across workers
//! - Records are immutable once written

pub mod memory;

use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Identifier, starting at 1.
    pub id: u64,
    /// Stored payload.
    pub data: String,
}

/// Key/value storage used by the data controller.
pub trait DataStore: Send + Sync + std::fmt::Debug {
    /// Look up a record by id.
    fn get_data(&self, id: u64) -> Option<DataRecord>;

    /// Store `data` under a freshly allocated id.
    fn set_data(&self, data: String) -> DataRecord;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
