//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the proxy subsystem.
//! Infrastructure layer provides concrete implementations.

pub mod document_loader;
pub mod file_system;
pub mod metadata_source;

pub use document_loader::{DocumentLoader, LoadedDocument};
pub use file_system::{FileSystem, FsError, FsResult};
pub use metadata_source::MetadataSource;
