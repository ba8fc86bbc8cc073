//! Persistence for the OAuth token set obtained on callback.
//!
//! The record is stored wholesale and never refreshed or expired. A single
//! slot is kept; every successful authorization overwrites it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

/// Provider-issued token fields, kept as an opaque JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRecord(pub Map<String, Value>);

impl TokenRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Overwrite the stored record.
    async fn save(&self, record: &TokenRecord) -> Result<()>;

    /// Read the stored record; `None` on any failure.
    async fn load(&self) -> Option<TokenRecord>;
}

/// Token record in a JSON file on local disk. No locking: concurrent
/// writers race and the last write wins.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, record: &TokenRecord) -> Result<()> {
        let data = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, data).await?;
        debug!("Stored token record at {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Option<TokenRecord> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(d) => d,
            Err(e) => {
                debug!("No token record at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<TokenRecord>(&data) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Ignoring unreadable token record {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// In-process token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, record: &TokenRecord) -> Result<()> {
        *self.slot.write().await = Some(record.clone());
        Ok(())
    }

    async fn load(&self) -> Option<TokenRecord> {
        self.slot.read().await.clone()
    }
}
