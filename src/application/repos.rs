//! Key-value persistence seam shared by every store.

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const POSTS_KEY: &str = "posts";
pub const PINNED_KEY: &str = "pinned";
pub const ADMIN_KEY: &str = "isAdmin";
pub const PASS_KEY: &str = "passHash";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value under `{key}` could not be parsed: {source}")]
    CorruptState {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RepoError {
    pub fn from_persistence(err: impl Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CorruptState {
            key: key.into(),
            source,
        }
    }
}

/// String-valued storage addressed by key, in the manner of browser local storage.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError>;

    async fn set(&self, key: &str, value: String) -> Result<(), RepoError>;
}

/// Read and parse a JSON value. Missing and empty entries both read as `None`.
pub async fn load_json<T>(store: &dyn KvStore, key: &str) -> Result<Option<T>, RepoError>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| RepoError::corrupt(key, err)),
        _ => Ok(None),
    }
}

pub async fn save_json<T>(store: &dyn KvStore, key: &str, value: &T) -> Result<(), RepoError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(RepoError::from_persistence)?;
    store.set(key, raw).await
}
