// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-store key-value adapter backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `<store name>`: key → JSON bytes
//!
//! One database file holds one named store. Deleting the store drops the
//! whole table; the next write recreates it.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition, TableError};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
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

    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// True when the key, or the whole store, does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// KvStore
// =============================================================================

/// Durable single-store key-value adapter.
pub struct KvStore {
    db: Database,
    store_name: String,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("store_name", &self.store_name)
            .finish_non_exhaustive()
    }
}

impl KvStore {
    /// Open (or create) the database at `path` and the store `store_name` inside it.
    pub fn open(path: &Path, store_name: &str) -> StoreResult<Self> {
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(Self::definition(store_name))?;
        }
        write_txn.commit()?;

        Ok(Self {
            db,
            store_name: store_name.to_string(),
        })
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    fn definition(store_name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
        TableDefinition::new(store_name)
    }

    /// Serialize `value` as JSON and write it under `key`, replacing any previous value.
    pub fn serialize<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_vec(value)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::definition(&self.store_name))?;
            table.insert(key, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Returns [`StoreError::NotFound`] when the key or the store is missing.
    pub fn deserialize<T: DeserializeOwned>(&self, key: &str) -> StoreResult<T> {
        let bytes = self
            .get(key)?
            .ok_or_else(|| StoreError::NotFound(format!("key {key} in store {}", self.store_name)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Raw bytes under `key`.
    ///
    /// `Ok(None)` for a missing key in an existing store; [`StoreError::NotFound`]
    /// once the store itself has been deleted.
    pub fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(Self::definition(&self.store_name)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => {
                return Err(StoreError::NotFound(format!("store {}", self.store_name)));
            }
            Err(e) => return Err(e.into()),
        };
        match table.get(key)? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    /// Drop the entire store, every key included.
    pub fn delete_store(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        let existed = write_txn.delete_table(Self::definition(&self.store_name))?;
        write_txn.commit()?;
        if !existed {
            tracing::debug!(store = %self.store_name, "Store already absent");
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        name: String,
        count: u32,
    }

    fn temp_store() -> (KvStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(&dir.path().join("test.db"), "config").unwrap();
        (store, dir)
    }

    #[test]
    fn get_on_empty_store_is_none() {
        let (store, _dir) = temp_store();
        assert_eq!(store.store_name(), "config");
        assert_eq!(store.get("config").unwrap(), None);
    }

    #[test]
    fn serialize_then_deserialize() {
        let (store, _dir) = temp_store();
        let record = Record {
            name: "a".to_string(),
            count: 3,
        };
        store.serialize("config", &record).unwrap();

        let back: Record = store.deserialize("config").unwrap();
        assert_eq!(back, record);
        assert!(store.get("config").unwrap().is_some());
    }

    #[test]
    fn serialize_replaces_previous_value() {
        let (store, _dir) = temp_store();
        store
            .serialize("config", &Record { name: "a".to_string(), count: 1 })
            .unwrap();
        store
            .serialize("config", &Record { name: "b".to_string(), count: 2 })
            .unwrap();

        let back: Record = store.deserialize("config").unwrap();
        assert_eq!(back.name, "b");
        assert_eq!(back.count, 2);
    }

    #[test]
    fn deserialize_missing_key_is_not_found() {
        let (store, _dir) = temp_store();
        let err = store.deserialize::<Record>("config").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn deserialize_malformed_value_is_serde_error() {
        let (store, _dir) = temp_store();
        store.serialize("config", &"just a string").unwrap();
        let err = store.deserialize::<Record>("config").unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[test]
    fn delete_store_removes_everything() {
        let (store, _dir) = temp_store();
        store
            .serialize("config", &Record { name: "a".to_string(), count: 1 })
            .unwrap();
        store.serialize("other", &1u32).unwrap();

        store.delete_store().unwrap();

        assert!(store.get("config").unwrap_err().is_not_found());
        assert!(store.deserialize::<Record>("other").unwrap_err().is_not_found());
    }

    #[test]
    fn write_after_delete_recreates_store() {
        let (store, _dir) = temp_store();
        store.delete_store().unwrap();
        store.delete_store().unwrap();

        store.serialize("config", &7u32).unwrap();
        assert_eq!(store.deserialize::<u32>("config").unwrap(), 7);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            let store = KvStore::open(&path, "config").unwrap();
            store.serialize("config", &42u32).unwrap();
        }
        let store = KvStore::open(&path, "config").unwrap();
        assert_eq!(store.deserialize::<u32>("config").unwrap(), 42);
    }
}
