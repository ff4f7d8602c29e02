//! Configuration module for docproxy
//!
//! Implements the configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DOCPROXY_*)
//! 3. Project config (docproxy.toml)
//! 4. User config (~/.config/docproxy/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{AutoGenerate, Config, MappingConfig, ProxyConfig, ProxySection};
