use std::path::PathBuf;

use observer_naming::NamingError;
use observer_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{operation} failed for {prefix}: {source}")]
    StoreAccess {
        operation: &'static str,
        prefix: String,
        #[source]
        source: StoreError,
    },

    #[error("non-UTC timestamp in {key}; only UTC file names are supported")]
    UnsupportedTimezone { key: String },

    #[error("unrecognized time zone name: {name}")]
    UnrecognizedTimezone { name: String },

    #[error("cannot {operation} session {session}: {reason}")]
    Precondition {
        operation: &'static str,
        session: String,
        reason: String,
    },

    #[error("cannot read timestamp from {key}: {source}")]
    Naming {
        key: String,
        #[source]
        source: NamingError,
    },

    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: prost::DecodeError,
    },

    #[error("preprocessing of {session} failed: {status}")]
    Preprocess { session: String, status: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RegistryError {
    pub(crate) fn store<'a>(
        operation: &'static str,
        prefix: &'a str,
    ) -> impl FnOnce(StoreError) -> RegistryError + 'a {
        move |source| RegistryError::StoreAccess {
            operation,
            prefix: prefix.to_string(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> RegistryError {
        let path = path.into();
        move |source| RegistryError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
