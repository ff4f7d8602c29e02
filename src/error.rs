//! Error types for docproxy
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::FsError;

/// Result type alias for docproxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Main error type for proxy generation and lazy loading
#[derive(Error, Debug)]
pub enum ProxyError {
    /// No proxy directory configured
    #[error("You must configure a proxy directory. See docs for details")]
    ProxyDirectoryRequired,

    /// No proxy namespace configured
    #[error("You must configure a proxy namespace")]
    ProxyNamespaceRequired,

    /// Proxy directory exists but cannot be written to
    #[error("Your proxy directory \"{}\" must be writable", path.display())]
    ProxyDirectoryNotWritable { path: PathBuf },

    /// Auto-generate mode outside the known set
    #[error("Invalid auto generate mode \"{value}\" given.")]
    InvalidAutoGenerateMode { value: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Mapping file could not be parsed or is inconsistent
    #[error("invalid mapping in {file}: {message}")]
    InvalidMapping { file: PathBuf, message: String },

    /// The metadata collaborator does not know the type
    #[error("no mapping metadata for class '{class}'")]
    UnknownClass { class: String },

    /// Identifier supplied to `get_proxy` lacks a primary key field
    #[error("Missing value for primary key {field} on {class}")]
    MissingIdentifierValue { class: String, field: String },

    /// Attempted write to an identifier field of a bound proxy
    #[error("identifier field '{field}' of {class} cannot be changed")]
    IdentifierImmutable { class: String, field: String },

    /// The load collaborator found no document for the identifier
    #[error("The \"{class}\" document with identifier {identifier} could not be found.")]
    DocumentNotFound { class: String, identifier: String },

    /// Stand-in file expected on disk but absent
    #[error("stand-in for '{class}' not found at {}", path.display())]
    StandInMissing { class: String, path: PathBuf },

    /// Stand-in file present but not a valid generated file for the type
    #[error("stand-in at {} is corrupt: {reason}", path.display())]
    StandInCorrupt { path: PathBuf, reason: String },

    /// In-process stand-in already registered under this name
    #[error("stand-in '{name}' is already defined")]
    StandInAlreadyDefined { name: String },

    /// File system port error
    #[error(transparent)]
    Fs(#[from] FsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    /// Configuration errors are raised at construction time and are fatal.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProxyError::ProxyDirectoryRequired
                | ProxyError::ProxyNamespaceRequired
                | ProxyError::ProxyDirectoryNotWritable { .. }
                | ProxyError::InvalidAutoGenerateMode { .. }
                | ProxyError::InvalidConfig { .. }
        )
    }
}
