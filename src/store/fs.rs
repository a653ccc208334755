use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{UploadStore, UploadedTable};
use crate::decode::TableKind;

/// Stores uploads under `root/kind=<kind>/NNNNN_<name>`.
///
/// The numeric prefix is a zero-padded sequence shared across both kinds, so
/// listing reproduces upload order for the whole store, not just within one
/// kind. Names are reduced to a conservative filename character set before
/// writing. Single-writer: two processes saving at once can race on the
/// sequence scan.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn kind_dir(&self, kind: TableKind) -> PathBuf {
        self.root.join(format!("kind={kind}"))
    }

    fn next_seq(&self) -> Result<u64> {
        let mut max_seq = 0;
        for kind in [TableKind::Csv, TableKind::Excel] {
            for file_name in read_entries(&self.kind_dir(kind))? {
                if let Some((seq, _)) = split_stored_name(&file_name) {
                    max_seq = max_seq.max(seq);
                }
            }
        }
        Ok(max_seq + 1)
    }
}

#[async_trait]
impl UploadStore for FsStore {
    async fn save(&self, name: &str, bytes: Vec<u8>, kind: TableKind) -> Result<UploadedTable> {
        let dir = self.kind_dir(kind);
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create upload directory {}", dir.display()))?;

        let seq = self.next_seq()?;
        let stored_name = sanitize_name(name);
        let path = dir.join(format!("{seq:05}_{stored_name}"));

        fs::write(&path, &bytes)
            .with_context(|| format!("cannot write upload {}", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Upload stored");

        Ok(UploadedTable {
            name: stored_name,
            kind,
            seq,
            bytes,
        })
    }

    async fn list(&self, kind: TableKind) -> Result<Vec<UploadedTable>> {
        let dir = self.kind_dir(kind);
        let mut tables = Vec::new();

        for file_name in read_entries(&dir)? {
            let Some((seq, name)) = split_stored_name(&file_name) else {
                continue;
            };
            let path = dir.join(&file_name);
            let bytes =
                fs::read(&path).with_context(|| format!("cannot read upload {}", path.display()))?;
            tables.push(UploadedTable {
                name: name.to_string(),
                kind,
                seq,
                bytes,
            });
        }

        tables.sort_by_key(|t| t.seq);
        Ok(tables)
    }
}

fn read_entries(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("cannot read upload directory {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

fn split_stored_name(file_name: &str) -> Option<(u64, &str)> {
    let (seq, rest) = file_name.split_once('_')?;
    Some((seq.parse().ok()?, rest))
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "table".to_string()
    } else {
        cleaned
    }
}
