//! Data stream classification by file name

use serde::{Deserialize, Serialize};

use crate::layout::{
    CONCATENATED_AUDIO_FILENAME, KEYPRESSES_SUFFIX, MERGED_TSV_FILENAME,
    SCREENSHOTS_MP4_FILENAME, SESSION_END_SUFFIX,
};
use crate::timestamp::timestamp_regex;

/// Kind of merged artifact produced by preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergedKind {
    Tsv,
    Audio,
    Video,
}

impl MergedKind {
    /// Fixed file name of this artifact inside a session
    pub fn file_name(&self) -> &'static str {
        match self {
            MergedKind::Tsv => MERGED_TSV_FILENAME,
            MergedKind::Audio => CONCATENATED_AUDIO_FILENAME,
            MergedKind::Video => SCREENSHOTS_MP4_FILENAME,
        }
    }
}

/// Recording modality of a session object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataStreamKind {
    SessionEndMarker,
    KeypressLog,
    AudioChunk,
    Screenshot,
    MergedArtifact(MergedKind),
    Other,
}

impl DataStreamKind {
    pub fn from_key(key: &str) -> Self {
        let name = file_name(key);

        if name.ends_with(".tsv") {
            return DataStreamKind::MergedArtifact(MergedKind::Tsv);
        }
        if name.ends_with(".wav") {
            return DataStreamKind::MergedArtifact(MergedKind::Audio);
        }
        if name.ends_with(".mp4") {
            return DataStreamKind::MergedArtifact(MergedKind::Video);
        }
        if name.ends_with(SESSION_END_SUFFIX) {
            return DataStreamKind::SessionEndMarker;
        }
        if name.ends_with(KEYPRESSES_SUFFIX) {
            return DataStreamKind::KeypressLog;
        }

        match data_stream_name(name) {
            Some("MicWaveIn") => DataStreamKind::AudioChunk,
            Some("Screenshot") => DataStreamKind::Screenshot,
            _ => DataStreamKind::Other,
        }
    }
}

/// Last `/`-separated segment of a key
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Stream name following the timestamp, e.g. `MicWaveIn` in
/// `20211103T112233456Z-MicWaveIn.flac`
pub fn data_stream_name(key: &str) -> Option<&str> {
    timestamp_regex()
        .captures(file_name(key))
        .and_then(|caps| caps.name("stream"))
        .map(|m| m.as_str())
}
