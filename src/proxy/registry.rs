//! In-process stand-in registry
//!
//! Plays the part of the loaded-type table: a stand-in defined here is
//! available to every factory sharing the registry, whether it was
//! synthesized in memory or read back from a generated file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{ProxyError, ProxyResult};

/// Where a defined stand-in came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandInOrigin {
    InMemory,
    File(PathBuf),
}

/// A synthesized stand-in type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandIn {
    /// Decorated stand-in name
    pub name: String,
    /// Mapped type it stands in for
    pub target: String,
    /// Generated source body
    pub source: String,
    pub origin: StandInOrigin,
}

/// Stand-ins defined in this process, keyed by stand-in name
#[derive(Debug, Default)]
pub struct StandInRegistry {
    defined: Mutex<HashMap<String, Arc<StandIn>>>,
}

impl StandInRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<StandIn>>> {
        self.defined.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<StandIn>> {
        self.lock().get(name).cloned()
    }

    /// Register `stand_in`. A name can only be defined once; the first
    /// definition stays in place.
    pub fn define(&self, stand_in: StandIn) -> ProxyResult<Arc<StandIn>> {
        let mut defined = self.lock();
        if defined.contains_key(&stand_in.name) {
            return Err(ProxyError::StandInAlreadyDefined {
                name: stand_in.name,
            });
        }
        let stand_in = Arc::new(stand_in);
        defined.insert(stand_in.name.clone(), Arc::clone(&stand_in));
        Ok(stand_in)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
