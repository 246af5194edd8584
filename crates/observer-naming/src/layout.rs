//! Fixed object-store layout and merged artifact names

/// Top-level prefix under which all observer uploads live
pub const OBSERVER_DATA_PREFIX: &str = "observer_data";

/// Data schema the recorder currently writes
pub const DEFAULT_SCHEMA_ID: &str = "SPO-2111";

/// Every session prefix starts with this literal
pub const SESSION_PREFIX_MARKER: &str = "session-";

pub const MERGED_TSV_FILENAME: &str = "merged.tsv";
pub const CONCATENATED_AUDIO_FILENAME: &str = "concatenated_audio.wav";
pub const SCREENSHOTS_MP4_FILENAME: &str = "screenshots.mp4";

/// The three files preprocessing produces for one session
pub const MERGED_ARTIFACT_FILENAMES: [&str; 3] = [
    MERGED_TSV_FILENAME,
    CONCATENATED_AUDIO_FILENAME,
    SCREENSHOTS_MP4_FILENAME,
];

pub const SESSION_END_SUFFIX: &str = "-SessionEnd.bin";
pub const KEYPRESSES_SUFFIX: &str = "-Keypresses.protobuf";

/// Extensions of objects derived from raw data rather than recorded directly
pub const DERIVED_EXTENSIONS: [&str; 4] = [".tsv", ".wav", ".mp4", ".json"];

/// Schema root, always ending in `/`
pub fn schema_root(schema_id: &str) -> String {
    format!("{}/{}/", OBSERVER_DATA_PREFIX, schema_id)
}

/// Whether the object's file name marks it as derived output
pub fn is_derived_artifact(key: &str) -> bool {
    let name = crate::stream::file_name(key);
    DERIVED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
