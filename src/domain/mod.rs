//! Domain Layer
//!
//! Boundaries between the proxy subsystem and its collaborators.
//!
//! ## Structure
//!
//! - `ports/` - Interface definitions for metadata, loading and file I/O
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or storage directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod ports;
