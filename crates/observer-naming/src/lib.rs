//! Naming conventions shared by the observer recorder and the data manager

mod error;
mod layout;
mod paths;
mod stream;
mod timestamp;

pub use error::NamingError;
pub use layout::{
    is_derived_artifact, schema_root, CONCATENATED_AUDIO_FILENAME, DEFAULT_SCHEMA_ID,
    DERIVED_EXTENSIONS, KEYPRESSES_SUFFIX, MERGED_ARTIFACT_FILENAMES, MERGED_TSV_FILENAME,
    OBSERVER_DATA_PREFIX, SCREENSHOTS_MP4_FILENAME, SESSION_END_SUFFIX, SESSION_PREFIX_MARKER,
};
pub use paths::{
    default_data_root_candidates, ensure_trailing_slash, infer_local_data_root, local_session_dir,
    session_basename,
};
pub use stream::{data_stream_name, file_name, DataStreamKind, MergedKind};
pub use timestamp::{parse_timestamp, FileTimestamp};
