mod common;

use common::{seed_complete_session, seed_raw_session, session_prefix, Fixture, CENTRAL_DISPLAY_NAME};
use observer_core::{
    AlwaysConfirm, LocalSessionStatus, NeverConfirm, Outcome, RegistryError, RemoteSessionStatus,
};

#[test]
fn test_full_lifecycle() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-001");
    seed_complete_session(&fx.store, &prefix, CENTRAL_DISPLAY_NAME);

    assert_eq!(fx.registry.local_status(&prefix).unwrap(), LocalSessionStatus::NotDownloaded);
    assert_eq!(fx.registry.remote_status(&prefix).unwrap(), RemoteSessionStatus::NotPreprocessed);

    let report = fx.registry.download(&prefix).unwrap();
    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.local, LocalSessionStatus::Downloaded);

    let report = fx.registry.preprocess(&prefix, &AlwaysConfirm).unwrap();
    assert_eq!(report.local, LocalSessionStatus::Preprocessed);
    assert_eq!(report.remote, RemoteSessionStatus::NotPreprocessed);
    let calls = fx.preprocessor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, fx.registry.local_dir(&prefix));
    assert_eq!(calls[0].1, "US/Central");

    let report = fx.registry.upload(&prefix, &AlwaysConfirm).unwrap();
    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.local, LocalSessionStatus::Preprocessed);
    assert_eq!(report.remote, RemoteSessionStatus::Preprocessed);

    // Only the merged artifacts go back up.
    assert_eq!(fx.store.write_count(), 3);
    assert!(fx.store.get(&format!("{}merged.tsv", prefix)).is_some());
    assert!(fx.store.get(&format!("{}concatenated_audio.wav", prefix)).is_some());
    assert!(fx.store.get(&format!("{}screenshots.mp4", prefix)).is_some());
}

#[test]
fn test_upload_requires_local_preprocessing() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-001");
    seed_complete_session(&fx.store, &prefix, CENTRAL_DISPLAY_NAME);
    fx.registry.download(&prefix).unwrap();

    let err = fx.registry.upload(&prefix, &AlwaysConfirm).unwrap_err();
    assert!(matches!(err, RegistryError::Precondition { operation: "upload", .. }));
    assert_eq!(fx.store.write_count(), 0);
}

#[test]
fn test_preprocess_requires_download() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-001");
    seed_complete_session(&fx.store, &prefix, CENTRAL_DISPLAY_NAME);

    let err = fx.registry.preprocess(&prefix, &AlwaysConfirm).unwrap_err();
    assert!(matches!(err, RegistryError::Precondition { operation: "preprocess", .. }));
    assert!(fx.preprocessor.calls().is_empty());
}

#[test]
fn test_download_without_session_end_stays_not_downloaded() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-002");
    seed_raw_session(&fx.store, &prefix);

    let report = fx.registry.download(&prefix).unwrap();
    assert_eq!(report.local, LocalSessionStatus::NotDownloaded);
    assert_eq!(fx.local_files(&prefix).len(), 3);
}

#[test]
fn test_download_twice_is_idempotent() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-001");
    seed_complete_session(&fx.store, &prefix, CENTRAL_DISPLAY_NAME);

    fx.registry.download(&prefix).unwrap();
    let first = fx.local_files(&prefix);
    let report = fx.registry.download(&prefix).unwrap();

    assert_eq!(fx.local_files(&prefix), first);
    assert_eq!(first.len(), 4);
    assert_eq!(report.local, LocalSessionStatus::Downloaded);
}

#[test]
fn test_declined_preprocess_keeps_results() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-001");
    seed_complete_session(&fx.store, &prefix, CENTRAL_DISPLAY_NAME);
    fx.registry.download(&prefix).unwrap();
    fx.registry.preprocess(&prefix, &AlwaysConfirm).unwrap();

    let report = fx.registry.preprocess(&prefix, &NeverConfirm).unwrap();
    assert_eq!(report.outcome, Outcome::Declined);
    assert_eq!(report.local, LocalSessionStatus::Preprocessed);
    assert_eq!(fx.preprocessor.calls().len(), 1);

    fx.registry.preprocess(&prefix, &AlwaysConfirm).unwrap();
    assert_eq!(fx.preprocessor.calls().len(), 2);
}

#[test]
fn test_declined_upload_writes_nothing() {
    let fx = Fixture::new();
    let prefix = session_prefix("session-001");
    seed_complete_session(&fx.store, &prefix, CENTRAL_DISPLAY_NAME);
    fx.registry.download(&prefix).unwrap();
    fx.registry.preprocess(&prefix, &AlwaysConfirm).unwrap();
    fx.registry.upload(&prefix, &AlwaysConfirm).unwrap();
    let writes = fx.store.write_count();

    let report = fx.registry.upload(&prefix, &NeverConfirm).unwrap();
    assert_eq!(report.outcome, Outcome::Declined);
    assert_eq!(report.remote, RemoteSessionStatus::Preprocessed);
    assert_eq!(fx.store.write_count(), writes);
}

#[test]
fn test_list_sessions_reports_both_axes() {
    let fx = Fixture::new();
    let done = session_prefix("session-001");
    let fresh = session_prefix("session-002");
    seed_complete_session(&fx.store, &done, CENTRAL_DISPLAY_NAME);
    seed_complete_session(&fx.store, &fresh, CENTRAL_DISPLAY_NAME);
    fx.store.insert(format!("{}merged.tsv", done), b"merged".to_vec());
    fx.registry.download(&done).unwrap();

    let sessions = fx.registry.list_sessions(common::CONTAINER).unwrap();
    assert_eq!(sessions.len(), 2);

    assert_eq!(sessions[0].session, "session-001/");
    assert_eq!(sessions[0].prefix, done);
    assert_eq!(sessions[0].local, LocalSessionStatus::Downloaded);
    assert_eq!(sessions[0].remote, RemoteSessionStatus::Preprocessed);

    assert_eq!(sessions[1].session, "session-002/");
    assert_eq!(sessions[1].local, LocalSessionStatus::NotDownloaded);
    assert_eq!(sessions[1].remote, RemoteSessionStatus::NotPreprocessed);
}
