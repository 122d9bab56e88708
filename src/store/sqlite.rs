use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use serde_json::Value;

use super::{
    merge_fields, ChangeCallback, DocumentStore, EntityPath, StoreError, Subscription, Watchers,
};

/// Local sqlite-backed document store: one table, path-addressed JSON
/// bodies. Change notifications are in-process only.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    watchers: Watchers,
}

impl SqliteStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Fully in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                 path TEXT PRIMARY KEY,
                 body TEXT NOT NULL,
                 updated_at TEXT NOT NULL DEFAULT (datetime('now'))
             );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            watchers: Watchers::new(),
        })
    }

    fn read(&self, path: &EntityPath) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock().expect("db lock");
        let mut stmt = conn.prepare("SELECT body FROM documents WHERE path = ?1")?;
        let result = stmt.query_row(params![path.as_str()], |row| row.get::<_, String>(0));
        match result {
            Ok(body) => {
                let value =
                    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(value))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &EntityPath, entity: &Value) -> Result<(), StoreError> {
        let body = entity.to_string();
        let conn = self.conn.lock().expect("db lock");
        conn.execute(
            "INSERT INTO documents (path, body) VALUES (?1, ?2)
             ON CONFLICT(path) DO UPDATE SET body = excluded.body,
                                             updated_at = datetime('now')",
            params![path.as_str(), body],
        )?;
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &EntityPath) -> Result<Option<Value>, StoreError> {
        self.read(path)
    }

    fn set(&self, path: &EntityPath, entity: Value) -> Result<(), StoreError> {
        self.write(path, &entity)?;
        self.watchers.notify(path, &entity);
        Ok(())
    }

    fn update(&self, path: &EntityPath, fields: Value) -> Result<(), StoreError> {
        let mut doc = self
            .read(path)?
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        if !doc.is_object() {
            return Err(StoreError::NotAnObject(path.to_string()));
        }
        merge_fields(&mut doc, fields);
        self.write(path, &doc)?;
        self.watchers.notify(path, &doc);
        Ok(())
    }

    fn subscribe(&self, path: &EntityPath, on_change: ChangeCallback) -> Subscription {
        self.watchers.subscribe(path, on_change)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.watchers.unsubscribe(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::paths;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn set_then_get_round_trips() {
        let store = SqliteStore::open_in_memory().unwrap();
        let path = paths::company(&Uuid::new_v4());
        store.set(&path, json!({"name": "Acme"})).unwrap();
        assert_eq!(store.get(&path).unwrap().unwrap()["name"], "Acme");
    }

    #[test]
    fn set_upserts_existing_documents() {
        let store = SqliteStore::open_in_memory().unwrap();
        let path = paths::company(&Uuid::new_v4());
        store.set(&path, json!({"v": 1})).unwrap();
        store.set(&path, json!({"v": 2})).unwrap();
        assert_eq!(store.get(&path).unwrap().unwrap()["v"], 2);
    }

    #[test]
    fn update_merges_and_missing_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        let path = paths::company(&Uuid::new_v4());

        assert!(matches!(
            store.update(&path, json!({"x": 1})),
            Err(StoreError::NotFound(_))
        ));

        store.set(&path, json!({"name": "Acme", "industry": ""})).unwrap();
        store.update(&path, json!({"industry": "Energy"})).unwrap();

        let doc = store.get(&path).unwrap().unwrap();
        assert_eq!(doc["name"], "Acme");
        assert_eq!(doc["industry"], "Energy");
    }

    #[test]
    fn subscribers_fire_on_both_write_paths() {
        let store = SqliteStore::open_in_memory().unwrap();
        let path = paths::company(&Uuid::new_v4());
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_in_cb = seen.clone();
        store.subscribe(
            &path,
            Box::new(move |_| {
                seen_in_cb.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.set(&path, json!({"v": 1})).unwrap();
        store.update(&path, json!({"v": 2})).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn persists_across_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tailboard.db");
        let path = paths::company(&Uuid::new_v4());

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set(&path, json!({"name": "Acme"})).unwrap();
        }

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(reopened.get(&path).unwrap().unwrap()["name"], "Acme");
    }
}
