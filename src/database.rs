//! Link store backed by the embedded redb database
//!
//! This module defines the database tables, the [`LinkStore`] operations the
//! create and redirect flows rely on, and the redb implementation of them.

use std::sync::Arc;

use rand::{distr::Alphanumeric, Rng};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::model::{LinkRecord, NewLink};

/// Length of a store-assigned link id
pub const ID_LEN: usize = 20;

/// Main table for storing link records
///
/// Key: store-assigned id (20 alphanumeric characters)
/// Value: JSON-serialized LinkRecord
///
/// Example:
/// - Key: "Qm3c8FvX0pLr2TzKabc123"
/// - Value: '{"id":"...","shortId":"abc123","redirectTo":"https://example.com","type":"CLICKS",...}'
pub const TABLE_LINKS: TableDefinition<&str, &str> = TableDefinition::new("links_v1");

/// Index table for resolving a short id to its record
///
/// Key: short id (last 6 characters of the record id)
/// Value: record id in [`TABLE_LINKS`]
pub const TABLE_SHORT_ID_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("short_id_index_v1");

/// Persistence operations for link records
///
/// Every operation runs in its own transaction. Callers that read a record
/// and then write it back get no isolation between the two steps.
pub trait LinkStore: Send + Sync + 'static {
    /// Inserts a new record with a fresh id, `clicks = 0` and no short id
    fn insert(&self, link: NewLink) -> Result<LinkRecord, StoreError>;

    /// Stores `short_id` on the record and indexes it for lookup
    fn assign_short_id(&self, id: &str, short_id: &str) -> Result<(), StoreError>;

    fn find_by_short_id(&self, short_id: &str) -> Result<Option<LinkRecord>, StoreError>;

    /// Overwrites the click counter of an existing record
    fn update_clicks(&self, id: &str, clicks: u64) -> Result<(), StoreError>;

    /// Removes the record; returns `true` if it existed
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Initializes the embedded database and creates required tables
///
/// # Example
///
/// ```no_run
/// # use templink::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINKS)?;
        write_txn.open_table(TABLE_SHORT_ID_INDEX)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// [`LinkStore`] over a shared redb [`Database`]
#[derive(Clone)]
pub struct RedbLinkStore {
    db: Arc<Database>,
}

impl RedbLinkStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn generate_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

fn decode(raw: &str) -> Result<LinkRecord, StoreError> {
    Ok(serde_json::from_str(raw)?)
}

impl LinkStore for RedbLinkStore {
    fn insert(&self, link: NewLink) -> Result<LinkRecord, StoreError> {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(TABLE_LINKS)?;

            let mut id = generate_id();
            while table.get(id.as_str())?.is_some() {
                id = generate_id();
            }

            let record = LinkRecord {
                id,
                short_id: None,
                redirect_to: link.redirect_to,
                policy: link.policy,
                clicks: 0,
            };
            let json = serde_json::to_string(&record)?;
            table.insert(record.id.as_str(), json.as_str())?;
            record
        };
        write_txn.commit()?;

        Ok(record)
    }

    fn assign_short_id(&self, id: &str, short_id: &str) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            let existing = table.get(id)?.map(|guard| guard.value().to_string());
            let mut record = match existing {
                Some(raw) => decode(&raw)?,
                None => return Err(StoreError::MissingRecord(id.to_string())),
            };

            record.short_id = Some(short_id.to_string());
            let json = serde_json::to_string(&record)?;
            table.insert(id, json.as_str())?;

            // Collisions are not detected: the newest record wins the index entry.
            let mut index = write_txn.open_table(TABLE_SHORT_ID_INDEX)?;
            index.insert(short_id, id)?;
        }
        write_txn.commit()?;

        Ok(())
    }

    fn find_by_short_id(&self, short_id: &str) -> Result<Option<LinkRecord>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TABLE_SHORT_ID_INDEX)?;
        let Some(id) = index.get(short_id)?.map(|guard| guard.value().to_string()) else {
            return Ok(None);
        };

        let table = read_txn.open_table(TABLE_LINKS)?;
        let raw = table.get(id.as_str())?.map(|guard| guard.value().to_string());
        raw.as_deref().map(decode).transpose()
    }

    fn update_clicks(&self, id: &str, clicks: u64) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            let existing = table.get(id)?.map(|guard| guard.value().to_string());
            let mut record = match existing {
                Some(raw) => decode(&raw)?,
                None => return Err(StoreError::MissingRecord(id.to_string())),
            };

            record.clicks = clicks;
            let json = serde_json::to_string(&record)?;
            table.insert(id, json.as_str())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            let removed = table.remove(id)?.map(|guard| guard.value().to_string());

            match removed {
                Some(raw) => {
                    if let Some(short_id) = decode(&raw)?.short_id {
                        let mut index = write_txn.open_table(TABLE_SHORT_ID_INDEX)?;
                        let points_here = index
                            .get(short_id.as_str())?
                            .is_some_and(|guard| guard.value() == id);
                        if points_here {
                            index.remove(short_id.as_str())?;
                        }
                    }
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;

        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExpirationPolicy;
    use tempfile::NamedTempFile;

    fn setup_store() -> (RedbLinkStore, NamedTempFile) {
        let temp_db = NamedTempFile::new().unwrap();
        let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
        (RedbLinkStore::new(Arc::new(db)), temp_db)
    }

    fn clicks_link(max_clicks: u64) -> NewLink {
        NewLink {
            redirect_to: "https://example.com".into(),
            policy: ExpirationPolicy::Clicks { max_clicks },
        }
    }

    #[test]
    fn insert_assigns_id_and_zero_clicks() {
        let (store, _temp_db) = setup_store();

        let record = store.insert(clicks_link(3)).unwrap();
        assert_eq!(record.id.len(), ID_LEN);
        assert!(record.id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(record.clicks, 0);
        assert_eq!(record.short_id, None);

        store.assign_short_id(&record.id, "abc123").unwrap();
        let stored = store.find_by_short_id("abc123").unwrap().unwrap();
        assert_eq!(stored.redirect_to, record.redirect_to);
        assert_eq!(stored.policy, record.policy);
        assert_eq!(stored.clicks, 0);
    }

    #[test]
    fn record_without_short_id_is_unreachable() {
        let (store, _temp_db) = setup_store();

        let record = store.insert(clicks_link(3)).unwrap();
        let tail = &record.id[ID_LEN - 6..];
        assert!(store.find_by_short_id(tail).unwrap().is_none());
    }

    #[test]
    fn assign_short_id_makes_record_findable() {
        let (store, _temp_db) = setup_store();

        let record = store.insert(clicks_link(3)).unwrap();
        store.assign_short_id(&record.id, "abc123").unwrap();

        let found = store.find_by_short_id("abc123").unwrap().unwrap();
        assert_eq!(found.id, record.id);
        assert_eq!(found.short_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn assign_short_id_on_missing_record_fails() {
        let (store, _temp_db) = setup_store();

        let err = store.assign_short_id("missing", "abc123").unwrap_err();
        assert!(matches!(err, StoreError::MissingRecord(_)));
    }

    #[test]
    fn update_clicks_overwrites_counter() {
        let (store, _temp_db) = setup_store();

        let record = store.insert(clicks_link(3)).unwrap();
        store.assign_short_id(&record.id, "abc123").unwrap();
        store.update_clicks(&record.id, 2).unwrap();

        let stored = store.find_by_short_id("abc123").unwrap().unwrap();
        assert_eq!(stored.clicks, 2);
    }

    #[test]
    fn delete_removes_record_and_index() {
        let (store, _temp_db) = setup_store();

        let record = store.insert(clicks_link(1)).unwrap();
        store.assign_short_id(&record.id, "abc123").unwrap();

        assert!(store.delete(&record.id).unwrap());
        assert!(store.find_by_short_id("abc123").unwrap().is_none());
        assert!(!store.delete(&record.id).unwrap());
    }

    #[test]
    fn deleting_shadowed_record_keeps_newer_index_entry() {
        let (store, _temp_db) = setup_store();

        let older = store.insert(clicks_link(1)).unwrap();
        store.assign_short_id(&older.id, "abc123").unwrap();
        let newer = store.insert(clicks_link(1)).unwrap();
        store.assign_short_id(&newer.id, "abc123").unwrap();

        assert!(store.delete(&older.id).unwrap());
        let found = store.find_by_short_id("abc123").unwrap().unwrap();
        assert_eq!(found.id, newer.id);
    }
}
