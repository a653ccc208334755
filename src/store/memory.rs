use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{UploadStore, UploadedTable};
use crate::decode::TableKind;

/// Upload store backed by a plain in-memory list.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Vec<UploadedTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UploadStore for MemoryStore {
    async fn save(&self, name: &str, bytes: Vec<u8>, kind: TableKind) -> Result<UploadedTable> {
        let mut tables = self.tables.lock().await;
        let table = UploadedTable {
            name: name.to_string(),
            kind,
            seq: tables.len() as u64 + 1,
            bytes,
        };
        tables.push(table.clone());
        Ok(table)
    }

    async fn list(&self, kind: TableKind) -> Result<Vec<UploadedTable>> {
        let tables = self.tables.lock().await;
        Ok(tables.iter().filter(|t| t.kind == kind).cloned().collect())
    }
}
