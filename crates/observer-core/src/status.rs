//! Local and remote lifecycle state of a session
//!
//! Both axes are recomputed from the filesystem and the object store on every
//! call; nothing here is cached.

use std::fmt;
use std::path::{Path, PathBuf};

use observer_naming::{
    ensure_trailing_slash, local_session_dir, MERGED_ARTIFACT_FILENAMES, MERGED_TSV_FILENAME,
    SESSION_END_SUFFIX,
};
use observer_store::ObjectStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RegistryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalSessionStatus {
    NotDownloaded,
    Downloaded,
    Preprocessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteSessionStatus {
    NotPreprocessed,
    Preprocessed,
}

impl fmt::Display for LocalSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LocalSessionStatus::NotDownloaded => "NOT_DOWNLOADED",
            LocalSessionStatus::Downloaded => "DOWNLOADED",
            LocalSessionStatus::Preprocessed => "PREPROCESSED",
        })
    }
}

impl fmt::Display for RemoteSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteSessionStatus::NotPreprocessed => "NOT_PREPROCESSED",
            RemoteSessionStatus::Preprocessed => "PREPROCESSED",
        })
    }
}

pub struct StatusClassifier<'a> {
    store: &'a dyn ObjectStore,
    data_root: &'a Path,
}

impl<'a> StatusClassifier<'a> {
    pub fn new(store: &'a dyn ObjectStore, data_root: &'a Path) -> Self {
        Self { store, data_root }
    }

    pub fn local_dir(&self, session_prefix: &str) -> PathBuf {
        local_session_dir(self.data_root, session_prefix)
    }

    pub fn local_status(&self, session_prefix: &str) -> Result<LocalSessionStatus> {
        let dir = self.local_dir(session_prefix);
        if !dir.is_dir() {
            return Ok(LocalSessionStatus::NotDownloaded);
        }

        if MERGED_ARTIFACT_FILENAMES
            .iter()
            .all(|name| nonempty_file_exists(&dir.join(name)))
        {
            return Ok(LocalSessionStatus::Preprocessed);
        }

        if has_session_end_marker(&dir)? {
            Ok(LocalSessionStatus::Downloaded)
        } else {
            Ok(LocalSessionStatus::NotDownloaded)
        }
    }

    pub fn remote_status(&self, session_prefix: &str) -> Result<RemoteSessionStatus> {
        let merged_key = format!("{}{}", ensure_trailing_slash(session_prefix), MERGED_TSV_FILENAME);
        let listing = self
            .store
            .list_all(&merged_key, None)
            .map_err(RegistryError::store("check remote status", session_prefix))?;

        // The listing is by prefix, so siblings like `merged.tsv.bak` show up too.
        let exact = listing.objects.iter().filter(|o| o.key == merged_key).count();
        match exact {
            1 => Ok(RemoteSessionStatus::Preprocessed),
            0 => Ok(RemoteSessionStatus::NotPreprocessed),
            n => {
                warn!(session = session_prefix, matches = n, "merged TSV key listed more than once");
                Ok(RemoteSessionStatus::NotPreprocessed)
            }
        }
    }
}

fn nonempty_file_exists(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

fn has_session_end_marker(dir: &Path) -> Result<bool> {
    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        SESSION_END_SUFFIX
    );
    let mut matches = glob::glob(&pattern)
        .map_err(|e| RegistryError::Config(format!("bad marker pattern {}: {}", pattern, e)))?;

    match matches.next() {
        Some(Ok(_)) => Ok(true),
        Some(Err(e)) => Err(RegistryError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        }),
        None => Ok(false),
    }
}
