use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use crate::application::repos::{KvStore, RepoError};

type Entries = BTreeMap<String, String>;

/// All keys kept in one JSON object on disk.
///
/// Every `get` re-reads the file, so a read always observes the preceding
/// write. Writes go to a temporary file in the same directory which then
/// replaces the target, so a crash never leaves a half-written store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_entries(&self) -> Result<Entries, RepoError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => return Err(RepoError::Io(err)),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&raw)
            .map_err(|err| RepoError::corrupt(self.path.display().to_string(), err))
    }

    async fn write_entries(&self, entries: Entries) -> Result<(), RepoError> {
        let path = self.path.clone();
        let payload = serde_json::to_vec_pretty(&entries).map_err(RepoError::from_persistence)?;

        tokio::task::spawn_blocking(move || write_atomically(&path, &payload))
            .await
            .map_err(RepoError::from_persistence)?
    }
}

fn write_atomically(path: &Path, payload: &[u8]) -> Result<(), RepoError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&directory)?;

    let mut file = NamedTempFile::new_in(&directory)?;
    file.write_all(payload)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| RepoError::Io(err.error))?;
    Ok(())
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), RepoError> {
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(entries).await?;
        debug!(
            target = "infra::kv::file",
            op = "file_store::set",
            result = "ok",
            key,
            path = %self.path.display(),
            "Persisted store entry"
        );
        Ok(())
    }
}
