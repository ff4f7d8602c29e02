//! Proxy instances
//!
//! A `Proxy` is a cheap, cloneable handle to one stand-in object. Clones share
//! the same state, so identity is pointer identity of the handle.
//!
//! Access follows a side-effecting getter contract: reading or writing any
//! slot other than an identifier or a skipped slot first runs the lazy
//! initializer, once.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::{ProxyError, ProxyResult};
use crate::metadata::ClassDescriptor;
use crate::models::{Identifier, ObjectState, SlotKey};
use crate::proxy::lazy::LazyInitializer;
use crate::proxy::serialize::{lazy_state_slot, serialize_state, Serialized};

/// Lazy initialization status; `Initialized` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyStatus {
    Uninitialized,
    Initializing,
    Initialized,
}

impl LazyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LazyStatus::Uninitialized => "uninitialized",
            LazyStatus::Initializing => "initializing",
            LazyStatus::Initialized => "initialized",
        }
    }
}

struct LazyState {
    slots: ObjectState,
    status: LazyStatus,
    /// Dropped after the first successful initialization
    initializer: Option<Arc<LazyInitializer>>,
}

struct ProxyInner {
    class: Arc<ClassDescriptor>,
    stand_in: String,
    identifier: Identifier,
    identifier_slots: BTreeSet<SlotKey>,
    skipped: Arc<BTreeSet<SlotKey>>,
    state: Mutex<LazyState>,
}

/// Handle to a lazily initialized stand-in
#[derive(Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

impl Proxy {
    /// Allocate an uninitialized stand-in with its identifier slots set and
    /// skipped slots holding their declared defaults
    pub(crate) fn new(
        class: Arc<ClassDescriptor>,
        stand_in: String,
        skipped: Arc<BTreeSet<SlotKey>>,
        identifier: Identifier,
        initializer: Arc<LazyInitializer>,
    ) -> Self {
        let mut slots = ObjectState::new();

        for declared in class.hierarchy() {
            for field in &declared.fields {
                let slot = SlotKey::for_field(&declared.name, &field.name, field.visibility);
                match &field.default {
                    Some(default) if skipped.contains(&slot) => {
                        slots.insert(slot, default.clone());
                    }
                    _ => {}
                }
            }
        }

        let mut identifier_slots = BTreeSet::new();
        for (field, value) in identifier.iter() {
            let slot = class.slot_for(field);
            slots.insert(slot.clone(), value.clone());
            identifier_slots.insert(slot);
        }

        Self {
            inner: Arc::new(ProxyInner {
                class,
                stand_in,
                identifier,
                identifier_slots,
                skipped,
                state: Mutex::new(LazyState {
                    slots,
                    status: LazyStatus::Uninitialized,
                    initializer: Some(initializer),
                }),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LazyState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.inner.class
    }

    /// Decorated stand-in type name
    pub fn stand_in_name(&self) -> &str {
        &self.inner.stand_in
    }

    pub fn identifier(&self) -> &Identifier {
        &self.inner.identifier
    }

    pub fn status(&self) -> LazyStatus {
        self.lock().status
    }

    /// Never triggers a load
    pub fn is_initialized(&self) -> bool {
        self.status() == LazyStatus::Initialized
    }

    /// Whether both handles point at the same stand-in
    pub fn same_instance(&self, other: &Proxy) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Slots readable without loading
    fn is_passthrough(&self, slot: &SlotKey) -> bool {
        self.inner.identifier_slots.contains(slot) || self.inner.skipped.contains(slot)
    }

    /// Force initialization.
    ///
    /// A no-op once initialized, and while an initialization of this same
    /// instance is already running further up the stack. On failure the
    /// instance is left uninitialized and a later call retries.
    pub fn load(&self) -> ProxyResult<()> {
        let initializer = {
            let mut state = self.lock();
            if state.status != LazyStatus::Uninitialized {
                return Ok(());
            }
            match state.initializer.clone() {
                Some(initializer) => {
                    state.status = LazyStatus::Initializing;
                    initializer
                }
                None => {
                    state.status = LazyStatus::Initialized;
                    return Ok(());
                }
            }
        };

        let result = initializer.initialize(self, &self.inner.identifier);

        let mut state = self.lock();
        match result {
            Ok(()) => {
                state.status = LazyStatus::Initialized;
                state.initializer = None;
                Ok(())
            }
            Err(err) => {
                state.status = LazyStatus::Uninitialized;
                Err(err)
            }
        }
    }

    /// Read a field by name
    pub fn get(&self, field: &str) -> ProxyResult<Option<Value>> {
        let slot = self.inner.class.slot_for(field);
        self.get_slot(&slot)
    }

    /// Read an exact slot; `None` means the slot is unset
    pub fn get_slot(&self, slot: &SlotKey) -> ProxyResult<Option<Value>> {
        if !self.is_passthrough(slot) {
            self.load()?;
        }
        Ok(self.lock().slots.get(slot).cloned())
    }

    /// Write a field by name. Identifier fields are immutable.
    pub fn set(&self, field: &str, value: Value) -> ProxyResult<()> {
        if self.inner.class.is_identifier(field) {
            return Err(ProxyError::IdentifierImmutable {
                class: self.inner.class.name().to_string(),
                field: field.to_string(),
            });
        }
        let slot = self.inner.class.slot_for(field);
        if !self.is_passthrough(&slot) {
            self.load()?;
        }
        self.lock().slots.insert(slot, value);
        Ok(())
    }

    /// Raw state including the internal bookkeeping slot
    pub fn slots(&self) -> ObjectState {
        let state = self.lock();
        let mut slots = state.slots.clone();
        slots.insert(
            lazy_state_slot(&self.inner.stand_in),
            Value::from(state.status.as_str()),
        );
        slots
    }

    /// Current state without bookkeeping, never loads
    pub fn state_snapshot(&self) -> ObjectState {
        self.lock().slots.clone()
    }

    /// Serialize as the real document would be; never loads
    pub fn serialize(&self) -> Serialized {
        serialize_state(&self.inner.class, &self.slots(), Some(&self.inner.stand_in))
    }

    /// Used by the initializer to copy loaded state in
    pub(crate) fn write_slot(&self, slot: SlotKey, value: Option<Value>) {
        let mut state = self.lock();
        match value {
            Some(value) => {
                state.slots.insert(slot, value);
            }
            None => {
                state.slots.remove(&slot);
            }
        }
    }
}

impl PartialEq for Proxy {
    /// Identity, not structural equality
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for Proxy {}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("stand_in", &self.inner.stand_in)
            .field("identifier", &self.inner.identifier)
            .field("status", &self.status())
            .finish()
    }
}
