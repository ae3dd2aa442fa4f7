//! # Snapshot Persistence
//!
//! Saves and restores the three collections as pretty-printed JSON arrays:
//!
//! | File | Contents |
//! |---|---|
//! | `stock.json` | every [`Lot`], exhausted ones included |
//! | `orders.json` | every [`Order`] with its allocations |
//! | `audit.json` | the audit log |
//!
//! A missing or blank file loads as an empty collection. Writes go to a `.tmp` file
//! that is then renamed over the old one, so a crash mid-write leaves the previous
//! snapshot intact.

use crate::model::{AuditEntry, Lot, Order};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const STOCK_FILE: &str = "stock.json";
pub const ORDERS_FILE: &str = "orders.json";
pub const AUDIT_FILE: &str = "audit.json";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Point-in-time copy of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stock: Vec<Lot>,
    pub orders: Vec<Order>,
    pub audit: Vec<AuditEntry>,
}

/// Reads and writes [`Snapshot`]s in one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn load(&self) -> Result<Snapshot, PersistenceError> {
        let snapshot = Snapshot {
            stock: self.read(STOCK_FILE).await?,
            orders: self.read(ORDERS_FILE).await?,
            audit: self.read(AUDIT_FILE).await?,
        };
        info!(
            lots = snapshot.stock.len(),
            orders = snapshot.orders.len(),
            audit = snapshot.audit.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self, snapshot), fields(dir = %self.dir.display()))]
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PersistenceError::Io {
                path: self.dir.clone(),
                source,
            })?;

        self.write(STOCK_FILE, &snapshot.stock).await?;
        self.write(ORDERS_FILE, &snapshot.orders).await?;
        self.write(AUDIT_FILE, &snapshot.audit).await?;
        info!("Snapshot saved");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, PersistenceError> {
        let path = self.dir.join(file);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot file");
                return Ok(Vec::new());
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|source| PersistenceError::Json { path, source })
    }

    async fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), PersistenceError> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(records).map_err(|source| {
            PersistenceError::Json {
                path: path.clone(),
                source,
            }
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| PersistenceError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| PersistenceError::Io { path, source })
    }
}
