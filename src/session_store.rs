//! Session persistence for in-progress setup.
//!
//! The wizard does not touch storage directly; it is handed a
//! `SessionStore` and calls `load`/`save`/`clear`. Hosts back this with
//! whatever they have (browser storage, disk, nothing); tests use the
//! in-memory implementation.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::models::SetupConfig;
use crate::wizard::SetupStep;

/// Everything needed to resume a setup session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub step: SetupStep,
    pub config: SetupConfig,
    pub setup_complete: bool,
}

pub trait SessionStore {
    fn load(&self) -> Option<SessionSnapshot>;
    fn save(&self, snapshot: &SessionSnapshot);
    fn clear(&self);
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn load(&self) -> Option<SessionSnapshot> {
        (**self).load()
    }
    fn save(&self, snapshot: &SessionSnapshot) {
        (**self).save(snapshot)
    }
    fn clear(&self) {
        (**self).clear()
    }
}

/// In-memory session store, shared via `Arc` when two owners need it.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<SessionSnapshot>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<SessionSnapshot> {
        self.slot.lock().expect("session store lock").clone()
    }

    fn save(&self, snapshot: &SessionSnapshot) {
        *self.slot.lock().expect("session store lock") = Some(snapshot.clone());
    }

    fn clear(&self) {
        *self.slot.lock().expect("session store lock") = None;
    }
}
