//! Upload storage.
//!
//! [`UploadedTable`] is a stored table: raw bytes plus the metadata the
//! selection side needs. [`UploadStore`] is the async trait for saving and
//! listing them. [`FsStore`] persists uploads under a root directory;
//! [`MemoryStore`] keeps them in memory for tests and embedders.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use anyhow::Result;

use crate::decode::TableKind;

/// A stored upload. `seq` is the global upload sequence number; higher means
/// more recent.
#[derive(Debug, Clone)]
pub struct UploadedTable {
    pub name: String,
    pub kind: TableKind,
    pub seq: u64,
    pub bytes: Vec<u8>,
}

/// Persists uploaded tables and lists them back in upload order.
#[async_trait::async_trait]
pub trait UploadStore: Send + Sync {
    async fn save(&self, name: &str, bytes: Vec<u8>, kind: TableKind) -> Result<UploadedTable>;

    /// Returns all stored tables of one kind, oldest first.
    async fn list(&self, kind: TableKind) -> Result<Vec<UploadedTable>>;
}
