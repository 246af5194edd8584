#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use observer_core::decode::proto;
use observer_core::{Config, Preprocessor, Registry, Result, TimezonePrompt};
use observer_naming::MERGED_ARTIFACT_FILENAMES;
use observer_store::MemoryStore;
use prost::Message;
use tempfile::TempDir;

pub const CONTAINER: &str = "observer_data/SPO-2111/user-a/device-1/2023/";
pub const OTHER_CONTAINER: &str = "observer_data/SPO-2111/user-b/device-7/2024/";

pub const CENTRAL_DISPLAY_NAME: &str = "(UTC-06:00) Central Time (US & Canada)";

pub fn session_prefix(name: &str) -> String {
    format!("{}{}/", CONTAINER, name)
}

pub fn session_end_bytes(zone: &str) -> Vec<u8> {
    proto::SessionMetadata {
        session_id: "fixture".to_string(),
        timezone: zone.to_string(),
    }
    .encode_to_vec()
}

pub fn keypress_bytes(count: usize) -> Vec<u8> {
    proto::KeyPresses {
        key_presses: vec![proto::KeyPress {}; count],
    }
    .encode_to_vec()
}

/// Raw recordings spanning 23:58 to 00:02 UTC, without a session end marker
pub fn seed_raw_session(store: &MemoryStore, prefix: &str) {
    store.insert(format!("{}20230101T235800000Z-MicWaveIn.flac", prefix), b"audio".to_vec());
    store.insert(
        format!("{}20230101T235900000Z-Keypresses.protobuf", prefix),
        keypress_bytes(3),
    );
    store.insert(format!("{}20230102T000000000Z-Screenshot.jpg", prefix), b"jpg".to_vec());
}

/// Raw recordings plus a session end marker carrying `zone`
pub fn seed_complete_session(store: &MemoryStore, prefix: &str, zone: &str) {
    seed_raw_session(store, prefix);
    store.insert(
        format!("{}20230102T000200000Z-SessionEnd.bin", prefix),
        session_end_bytes(zone),
    );
}

/// Writes the merged artifacts and records each invocation
#[derive(Clone, Default)]
pub struct FakePreprocessor {
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl FakePreprocessor {
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Preprocessor for FakePreprocessor {
    fn run(&self, session_dir: &Path, timezone_id: &str) -> Result<()> {
        for name in MERGED_ARTIFACT_FILENAMES {
            std::fs::write(session_dir.join(name), b"merged").unwrap();
        }
        self.calls
            .lock()
            .unwrap()
            .push((session_dir.to_path_buf(), timezone_id.to_string()));
        Ok(())
    }
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub preprocessor: FakePreprocessor,
    pub registry: Registry,
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self::build(page_size, None)
    }

    pub fn with_prompt(prompt: TimezonePrompt) -> Self {
        Self::build(1000, Some(prompt))
    }

    fn build(page_size: usize, prompt: Option<TimezonePrompt>) -> Self {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::with_page_size(page_size));
        let preprocessor = FakePreprocessor::default();
        let config = Config {
            local_data_root: Some(temp.path().join("data")),
            ..Config::new()
        };

        let mut registry = Registry::new(Box::new(store.clone()), config)
            .unwrap()
            .with_preprocessor(Box::new(preprocessor.clone()));
        if let Some(prompt) = prompt {
            registry = registry.with_timezone_prompt(prompt).unwrap();
        }

        Self {
            store,
            preprocessor,
            registry,
            temp,
        }
    }

    /// Sorted file names in a session's local directory
    pub fn local_files(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.registry.local_dir(prefix))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
