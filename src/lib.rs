//! docproxy - lazy-loading document proxies
//!
//! Hands out stand-ins for persisted documents that carry only their
//! identifier and load the rest of their state on first access. Stand-in
//! types are generated ahead of time as Rust source, or defined in-process.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod metadata;
pub mod models;
pub mod proxy;

// Re-exports for convenience (generated stand-ins rely on `Proxy`,
// `ProxyResult` and `Value` being reachable from the crate root)
pub use config::{AutoGenerate, Config, ProxyConfig};
pub use domain::ports::{DocumentLoader, FileSystem, LoadedDocument, MetadataSource};
pub use error::{ProxyError, ProxyResult};
pub use metadata::{ClassDescriptor, ClassKind, DeclaredField, DeclaredType};
pub use models::{Identifier, ObjectState, SlotKey, Visibility};
pub use proxy::{ClassNameResolver, LazyStatus, Proxy, ProxyFactory, Serialized};
pub use serde_json::Value;
