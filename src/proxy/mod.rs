//! Lazy-loading proxy subsystem
//!
//! - `resolver`: stand-in names and their targets
//! - `skip_list`: slots a stand-in never loads for
//! - `instance`: the `Proxy` handle and its lazy state
//! - `lazy`: one-shot hydration through the document loader
//! - `serialize`: serialization shared by stand-ins and real documents
//! - `emitter` / `registry`: stand-in source generation and definition
//! - `factory`: caching, generation policy, proxy allocation

pub mod emitter;
pub mod factory;
pub mod instance;
pub mod lazy;
pub mod registry;
pub mod resolver;
pub mod serialize;
pub mod skip_list;

pub use emitter::{EmittedStandIn, ProxyEmitter, STAND_IN_TEMPLATE};
pub use factory::{ProxyConstructor, ProxyDescriptor, ProxyFactory};
pub use instance::{LazyStatus, Proxy};
pub use lazy::LazyInitializer;
pub use registry::{StandIn, StandInOrigin, StandInRegistry};
pub use resolver::{stand_in_name, ClassNameResolver, MARKER};
pub use serialize::{
    lazy_state_slot, select_fields, serialize_state, Diagnostic, DiagnosticSeverity, Serialized,
    LAZY_STATE_FIELD,
};
pub use skip_list::SkipListBuilder;
