//! Pluggable document persistence.
//!
//! The core consumes an opaque, path-addressed document store: fetch by
//! path, write, shallow-merge update, and change subscriptions. Hosts wire
//! a real backend; the crate ships an in-memory store and a local sqlite
//! store.

pub mod memory;
pub mod paths;
pub mod sqlite;

pub use memory::MemoryStore;
pub use paths::EntityPath;
pub use sqlite::SqliteStore;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no document at {0}")]
    NotFound(String),

    #[error("document at {0} is not a JSON object")]
    NotAnObject(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored document could not be decoded: {0}")]
    Decode(String),
}

/// Callback invoked with the new document value after each write.
pub type ChangeCallback = Box<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

pub trait DocumentStore: Send + Sync {
    fn get(&self, path: &EntityPath) -> Result<Option<Value>, StoreError>;

    /// Upsert the document at `path`.
    fn set(&self, path: &EntityPath, entity: Value) -> Result<(), StoreError>;

    /// Shallow-merge `fields` into the existing document. Fails with
    /// `NotFound` when no document exists at `path`.
    fn update(&self, path: &EntityPath, fields: Value) -> Result<(), StoreError>;

    fn subscribe(&self, path: &EntityPath, on_change: ChangeCallback) -> Subscription;

    fn unsubscribe(&self, subscription: Subscription);
}

/// Shallow merge of object fields, Firestore-update style. Non-object
/// `fields` replace the base wholesale.
pub(crate) fn merge_fields(base: &mut Value, fields: Value) {
    match (base.as_object_mut(), fields) {
        (Some(base_map), Value::Object(field_map)) => {
            for (key, value) in field_map {
                base_map.insert(key, value);
            }
        }
        (_, other) => *base = other,
    }
}

/// In-process change-watcher registry shared by the store impls.
pub(crate) struct Watchers {
    next_id: AtomicU64,
    by_path: Mutex<HashMap<String, Vec<(u64, ChangeCallback)>>>,
    paths_by_id: Mutex<HashMap<u64, String>>,
}

impl Watchers {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            by_path: Mutex::new(HashMap::new()),
            paths_by_id: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn subscribe(&self, path: &EntityPath, on_change: ChangeCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.by_path
            .lock()
            .expect("watcher lock")
            .entry(path.as_str().to_string())
            .or_default()
            .push((id, on_change));
        self.paths_by_id
            .lock()
            .expect("watcher lock")
            .insert(id, path.as_str().to_string());
        Subscription(id)
    }

    pub(crate) fn unsubscribe(&self, subscription: Subscription) {
        let Some(path) = self
            .paths_by_id
            .lock()
            .expect("watcher lock")
            .remove(&subscription.0)
        else {
            return;
        };
        let mut by_path = self.by_path.lock().expect("watcher lock");
        if let Some(list) = by_path.get_mut(&path) {
            list.retain(|(id, _)| *id != subscription.0);
            if list.is_empty() {
                by_path.remove(&path);
            }
        }
    }

    pub(crate) fn notify(&self, path: &EntityPath, value: &Value) {
        let by_path = self.by_path.lock().expect("watcher lock");
        if let Some(list) = by_path.get(path.as_str()) {
            for (_, callback) in list {
                callback(value);
            }
        }
    }
}
