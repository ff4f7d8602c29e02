//! DocumentLoader port - the persistence collaborator
//!
//! Given a class and identifier criteria, returns the fully hydrated document
//! or `None` when nothing is stored under that identifier.

use crate::error::ProxyResult;
use crate::metadata::ClassDescriptor;
use crate::models::{Identifier, ObjectState};
use crate::proxy::Proxy;

/// What a load produced
#[derive(Debug, Clone)]
pub enum LoadedDocument {
    /// Freshly hydrated state of a real document
    Document(ObjectState),
    /// An instance already tracked by the identity map. May be the very
    /// proxy being initialized.
    Managed(Proxy),
}

/// Loads documents by identifier
pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        class: &ClassDescriptor,
        criteria: &Identifier,
    ) -> ProxyResult<Option<LoadedDocument>>;
}
