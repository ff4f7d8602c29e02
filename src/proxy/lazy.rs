//! Lazy initializer
//!
//! Runs once per stand-in, on the first access to a mapped slot: asks the
//! loader for the real document and copies its mapped state over.

use std::fmt;
use std::sync::Arc;

use crate::domain::ports::{DocumentLoader, LoadedDocument};
use crate::error::{ProxyError, ProxyResult};
use crate::metadata::ClassDescriptor;
use crate::models::{Identifier, SlotKey};
use crate::proxy::instance::Proxy;

/// Hydrates stand-ins of one class from the load collaborator
pub struct LazyInitializer {
    class: Arc<ClassDescriptor>,
    loader: Arc<dyn DocumentLoader>,
    /// Every persistent field and association slot, ancestors included
    mapped_slots: Vec<SlotKey>,
}

impl LazyInitializer {
    pub fn new(class: Arc<ClassDescriptor>, loader: Arc<dyn DocumentLoader>) -> Self {
        let mapped_slots = class.mapped_slots();
        Self {
            class,
            loader,
            mapped_slots,
        }
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    /// Load the document behind `identifier` and copy its mapped state into
    /// `proxy`. Fails with `DocumentNotFound` without touching the proxy.
    pub fn initialize(&self, proxy: &Proxy, identifier: &Identifier) -> ProxyResult<()> {
        tracing::debug!(class = self.class.name(), %identifier, "initializing proxy");

        let loaded = self
            .loader
            .load(&self.class, identifier)?
            .ok_or_else(|| ProxyError::DocumentNotFound {
                class: self.class.name().to_string(),
                identifier: identifier.to_string(),
            })?;

        let original = match loaded {
            // The load resolved back to this very stand-in
            LoadedDocument::Managed(original) if original.same_instance(proxy) => return Ok(()),
            // Another tracked instance: its state only counts once loaded
            LoadedDocument::Managed(original) => {
                original.load()?;
                original.state_snapshot()
            }
            LoadedDocument::Document(state) => state,
        };

        for slot in &self.mapped_slots {
            if identifier.contains(slot.name()) {
                continue;
            }
            proxy.write_slot(slot.clone(), original.get(slot).cloned());
        }

        Ok(())
    }
}

impl fmt::Debug for LazyInitializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyInitializer")
            .field("class", &self.class.name())
            .field("mapped_slots", &self.mapped_slots)
            .finish()
    }
}
