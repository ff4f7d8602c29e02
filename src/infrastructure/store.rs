//! In-memory document store
//!
//! Implements the DocumentLoader port over a map keyed by type name and
//! identifier. Also plays the identity map: a proxy registered with
//! `insert_managed` is what later loads of that identifier resolve to.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::ports::{DocumentLoader, LoadedDocument};
use crate::error::ProxyResult;
use crate::metadata::ClassDescriptor;
use crate::models::{Identifier, ObjectState};
use crate::proxy::Proxy;

/// `(type name, canonical identifier)`
type DocumentKey = (String, String);

/// Documents held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: Mutex<HashMap<DocumentKey, LoadedDocument>>,
    loads: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DocumentKey, LoadedDocument>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(class: &str, identifier: &Identifier) -> DocumentKey {
        (class.to_string(), identifier.to_string())
    }

    /// Store the state of a real document
    pub fn insert(&self, class: &str, identifier: &Identifier, state: ObjectState) {
        self.lock().insert(
            Self::key(class, identifier),
            LoadedDocument::Document(state),
        );
    }

    /// Track `proxy` as the managed instance for its identifier
    pub fn insert_managed(&self, proxy: &Proxy) {
        self.lock().insert(
            Self::key(proxy.class().name(), proxy.identifier()),
            LoadedDocument::Managed(proxy.clone()),
        );
    }

    pub fn remove(&self, class: &str, identifier: &Identifier) -> bool {
        self.lock().remove(&Self::key(class, identifier)).is_some()
    }

    /// Number of `load` calls served so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl DocumentLoader for InMemoryStore {
    fn load(
        &self,
        class: &ClassDescriptor,
        criteria: &Identifier,
    ) -> ProxyResult<Option<LoadedDocument>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let found = self.lock().get(&Self::key(class.name(), criteria)).cloned();
        tracing::debug!(class = class.name(), %criteria, found = found.is_some(), "store lookup");
        Ok(found)
    }
}
