use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{
    merge_fields, ChangeCallback, DocumentStore, EntityPath, StoreError, Subscription, Watchers,
};

/// In-memory document store. The default backend for tests and the
/// reference implementation of the adapter contract.
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
    watchers: Watchers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            watchers: Watchers::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.lock().expect("store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &EntityPath) -> Result<Option<Value>, StoreError> {
        Ok(self
            .documents
            .lock()
            .expect("store lock")
            .get(path.as_str())
            .cloned())
    }

    fn set(&self, path: &EntityPath, entity: Value) -> Result<(), StoreError> {
        self.documents
            .lock()
            .expect("store lock")
            .insert(path.as_str().to_string(), entity.clone());
        self.watchers.notify(path, &entity);
        Ok(())
    }

    fn update(&self, path: &EntityPath, fields: Value) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().expect("store lock");
        let doc = documents
            .get_mut(path.as_str())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        if !doc.is_object() {
            return Err(StoreError::NotAnObject(path.to_string()));
        }
        merge_fields(doc, fields);
        let updated = doc.clone();
        drop(documents);
        self.watchers.notify(path, &updated);
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
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        let path = paths::company(&Uuid::new_v4());
        assert!(store.get(&path).unwrap().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        let path = paths::company(&Uuid::new_v4());
        store.set(&path, json!({"name": "Acme"})).unwrap();
        assert_eq!(store.get(&path).unwrap().unwrap()["name"], "Acme");
    }

    #[test]
    fn update_merges_fields() {
        let store = MemoryStore::new();
        let path = paths::company(&Uuid::new_v4());
        store.set(&path, json!({"name": "Acme", "size": "1-50 employees"})).unwrap();
        store.update(&path, json!({"size": "51-200 employees"})).unwrap();

        let doc = store.get(&path).unwrap().unwrap();
        assert_eq!(doc["name"], "Acme");
        assert_eq!(doc["size"], "51-200 employees");
    }

    #[test]
    fn update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let path = paths::company(&Uuid::new_v4());
        let result = store.update(&path, json!({"x": 1}));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn subscribers_see_writes_until_unsubscribed() {
        let store = MemoryStore::new();
        let path = paths::company(&Uuid::new_v4());
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_in_cb = seen.clone();
        let sub = store.subscribe(
            &path,
            Box::new(move |_| {
                seen_in_cb.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.set(&path, json!({"v": 1})).unwrap();
        store.update(&path, json!({"v": 2})).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        store.unsubscribe(sub);
        store.set(&path, json!({"v": 3})).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2, "no events after unsubscribe");
    }

    #[test]
    fn subscription_is_per_path() {
        let store = MemoryStore::new();
        let watched = paths::company(&Uuid::new_v4());
        let other = paths::company(&Uuid::new_v4());
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_in_cb = seen.clone();
        store.subscribe(
            &watched,
            Box::new(move |_| {
                seen_in_cb.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.set(&other, json!({"v": 1})).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
