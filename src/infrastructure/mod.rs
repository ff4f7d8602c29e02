//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Memory)
//! - `metadata` - In-memory metadata source
//! - `mapping` - TOML mapping file loader feeding the metadata source
//! - `store` - In-memory document store and identity map

pub mod fs;
pub mod mapping;
pub mod metadata;
pub mod store;

// Re-export for convenience
pub use fs::{LocalFs, MemoryFs};
pub use mapping::MappingFile;
pub use metadata::InMemoryMetadata;
pub use store::InMemoryStore;
