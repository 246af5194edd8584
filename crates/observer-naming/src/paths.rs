//! Local directory layout for mirrored sessions

use std::path::{Path, PathBuf};

use crate::error::NamingError;

/// Candidate local data roots, most specific first
pub fn default_data_root_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("/").join("SpeakFasterObs").join("data")];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("SpeakFasterObs").join("data"));
        candidates.push(home.join("sf_observer_data"));
    }
    candidates
}

/// First candidate that exists as a directory
pub fn infer_local_data_root(candidates: &[PathBuf]) -> Result<PathBuf, NamingError> {
    candidates
        .iter()
        .find(|dir| dir.is_dir())
        .cloned()
        .ok_or_else(|| NamingError::NoDataRoot {
            candidates: candidates.to_vec(),
        })
}

/// Prefix with exactly the trailing `/` listings expect
pub fn ensure_trailing_slash(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}

/// Last non-empty segment of a session prefix (`a/b/session-1/` -> `session-1`)
pub fn session_basename(session_prefix: &str) -> &str {
    session_prefix
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(session_prefix)
}

/// Directory a session is mirrored into
pub fn local_session_dir(data_root: &Path, session_prefix: &str) -> PathBuf {
    data_root.join(session_basename(session_prefix))
}
