use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("no timestamp found in file name: {0}")]
    NoTimestamp(String),

    #[error("invalid timestamp {timestamp:?} in file name {name}")]
    InvalidTimestamp { name: String, timestamp: String },

    #[error("cannot find a local data root among {candidates:?}; create one first")]
    NoDataRoot { candidates: Vec<PathBuf> },
}
