// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded transaction database backed by redb (pure Rust, ACID).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{Metadata, TransactionId, TransactionInfo};
use crate::services::{CollaboratorError, TransactionStore};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: hex tx id → serialized TransactionInfo (JSON bytes).
const TRANSACTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("transactions");

/// Index: `height_be | tx_hash` → hex tx id, for ascending height scans.
const HEIGHT_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("height_index");

/// Known assets: hex asset id → serialized Metadata.
const ASSETS: TableDefinition<&str, &[u8]> = TableDefinition::new("assets");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TxDbError {
    #[error("cannot create database directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Join(String),
}

pub type TxDbResult<T> = Result<T, TxDbError>;

impl From<TxDbError> for CollaboratorError {
    fn from(err: TxDbError) -> Self {
        CollaboratorError::Store(err.to_string())
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Composite key for the height index: `height_be | tx_hash`.
fn make_height_key(height: u64, id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + id.hash.len());
    key.extend_from_slice(&height.to_be_bytes());
    key.extend_from_slice(&id.hash);
    key
}

fn height_of_key(key: &[u8]) -> Option<u64> {
    key.get(..8)
        .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
        .map(u64::from_be_bytes)
}

// =============================================================================
// TxDatabase
// =============================================================================

/// Embedded ACID transaction database. Clones share the same file.
#[derive(Clone)]
pub struct TxDatabase {
    db: Arc<Database>,
}

impl TxDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> TxDbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TxDbError::CreateDir)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TRANSACTIONS)?;
            let _ = write_txn.open_table(HEIGHT_INDEX)?;
            let _ = write_txn.open_table(ASSETS)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Insert or replace a transaction and its height index entry.
    pub fn save_transaction(&self, info: &TransactionInfo) -> TxDbResult<()> {
        let json = serde_json::to_vec(info)?;
        let id = info.id.to_hex();

        let write_txn = self.db.begin_write()?;
        {
            let mut tx_table = write_txn.open_table(TRANSACTIONS)?;
            let previous = tx_table
                .insert(id.as_str(), json.as_slice())?
                .map(|old| serde_json::from_slice::<TransactionInfo>(old.value()))
                .transpose()?;

            let mut idx_table = write_txn.open_table(HEIGHT_INDEX)?;
            if let Some(previous) = previous {
                idx_table.remove(make_height_key(previous.height, &previous.id).as_slice())?;
            }
            let key = make_height_key(info.height, &info.id);
            idx_table.insert(key.as_slice(), id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a single transaction by id.
    pub fn get_transaction(&self, id: &TransactionId) -> TxDbResult<Option<TransactionInfo>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS)?;
        match table.get(id.to_hex().as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Transactions with `start <= height <= end`, ascending by height.
    pub fn list_transactions(
        &self,
        start_height: Option<u64>,
        end_height: Option<u64>,
    ) -> TxDbResult<Vec<TransactionInfo>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(HEIGHT_INDEX)?;
        let tx_table = read_txn.open_table(TRANSACTIONS)?;

        let start = start_height.unwrap_or(0).to_be_bytes();
        let mut results = Vec::new();

        for entry in idx_table.range::<&[u8]>(start.as_slice()..)? {
            let (key, id) = entry?;
            let height = height_of_key(key.value()).unwrap_or(0);
            if end_height.is_some_and(|end| height > end) {
                break;
            }
            if let Some(value) = tx_table.get(id.value())? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok(results)
    }

    // =========================================================================
    // Assets
    // =========================================================================

    pub fn save_asset(&self, metadata: &Metadata) -> TxDbResult<()> {
        let json = serde_json::to_vec(metadata)?;
        let key = hex::encode(&metadata.penumbra_asset_id.inner);
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ASSETS)?;
            table.insert(key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn list_assets(&self) -> TxDbResult<Vec<Metadata>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ASSETS)?;
        let mut assets = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            assets.push(serde_json::from_slice(value.value())?);
        }
        Ok(assets)
    }
}

/// Runs the blocking redb calls off the async executor.
async fn blocking<T, F>(db: &TxDatabase, f: F) -> Result<T, CollaboratorError>
where
    T: Send + 'static,
    F: FnOnce(&TxDatabase) -> TxDbResult<T> + Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| TxDbError::Join(e.to_string()))?
        .map_err(CollaboratorError::from)
}

#[async_trait]
impl TransactionStore for TxDatabase {
    async fn get_transaction_by_hash(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionInfo>, CollaboratorError> {
        let id = id.clone();
        blocking(self, move |db| db.get_transaction(&id)).await
    }

    async fn list_transactions(
        &self,
        start_height: Option<u64>,
        end_height: Option<u64>,
    ) -> Result<Vec<TransactionInfo>, CollaboratorError> {
        blocking(self, move |db| db.list_transactions(start_height, end_height)).await
    }

    async fn list_assets(&self) -> Result<Vec<Metadata>, CollaboratorError> {
        blocking(self, |db| db.list_assets()).await
    }
}

// =============================================================================
// Tests
// =============================================================================
