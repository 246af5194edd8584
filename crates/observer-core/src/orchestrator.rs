//! Download, preprocess and upload of a single session
//!
//! Every step re-classifies the session when it finishes, so callers see the
//! stores as they are rather than as the step assumed it left them.

use observer_naming::{ensure_trailing_slash, CONCATENATED_AUDIO_FILENAME, SCREENSHOTS_MP4_FILENAME};
use observer_store::{ObjectStore, SyncFilters};
use serde::Serialize;
use tracing::info;

use crate::aggregate::SessionAggregator;
use crate::confirm::Confirm;
use crate::error::{RegistryError, Result};
use crate::preprocess::Preprocessor;
use crate::status::{LocalSessionStatus, RemoteSessionStatus, StatusClassifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    /// The user declined to redo work that was already done
    Declined,
}

/// Result of one orchestrator step with the freshly computed state
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub session_prefix: String,
    pub outcome: Outcome,
    pub local: LocalSessionStatus,
    pub remote: RemoteSessionStatus,
}

/// Only merged artifacts go back up; raw recordings never do
pub fn upload_filters() -> Result<SyncFilters> {
    let filters = SyncFilters::new()
        .exclude("*")
        .and_then(|f| f.include("*.tsv"))
        .and_then(|f| f.include(CONCATENATED_AUDIO_FILENAME))
        .and_then(|f| f.include(SCREENSHOTS_MP4_FILENAME))
        .map_err(|e| RegistryError::Config(e.to_string()))?;
    Ok(filters)
}

pub struct SyncOrchestrator<'a> {
    store: &'a dyn ObjectStore,
    classifier: StatusClassifier<'a>,
    aggregator: SessionAggregator<'a>,
    preprocessor: &'a dyn Preprocessor,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        classifier: StatusClassifier<'a>,
        aggregator: SessionAggregator<'a>,
        preprocessor: &'a dyn Preprocessor,
    ) -> Self {
        Self {
            store,
            classifier,
            aggregator,
            preprocessor,
        }
    }

    /// Mirror the session's remote objects into its local directory
    pub fn download(&self, session_prefix: &str) -> Result<OperationReport> {
        let prefix = ensure_trailing_slash(session_prefix);
        let dir = self.classifier.local_dir(&prefix);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(RegistryError::io(&dir))?;
            info!(dir = %dir.display(), "created session directory");
        }

        info!(session = %prefix, dir = %dir.display(), "syncing session to local");
        self.store
            .sync_down(&prefix, &dir)
            .map_err(RegistryError::store("download", &prefix))?;
        info!(session = %prefix, "download complete");

        self.report(&prefix, Outcome::Completed)
    }

    /// Run the preprocessing transform over a downloaded session
    pub fn preprocess(&self, session_prefix: &str, confirm: &dyn Confirm) -> Result<OperationReport> {
        let prefix = ensure_trailing_slash(session_prefix);

        match self.classifier.local_status(&prefix)? {
            LocalSessionStatus::NotDownloaded => {
                return Err(RegistryError::Precondition {
                    operation: "preprocess",
                    session: prefix,
                    reason: "the session has not been downloaded".to_string(),
                });
            }
            LocalSessionStatus::Preprocessed => {
                let question = format!(
                    "Session {} has already been preprocessed locally. \
                     Do you want to run preprocessing again?",
                    prefix
                );
                if !confirm.confirm(&question) {
                    info!(session = %prefix, "preprocessing was not run");
                    return self.report(&prefix, Outcome::Declined);
                }
            }
            LocalSessionStatus::Downloaded => {}
        }

        let details = self.aggregator.get_details(&prefix)?;
        let dir = self.classifier.local_dir(&prefix);
        info!(session = %prefix, zone = details.timezone.name(), "preprocessing session");
        self.preprocessor.run(&dir, details.timezone.name())?;

        self.report(&prefix, Outcome::Completed)
    }

    /// Upload merged artifacts of a locally preprocessed session
    pub fn upload(&self, session_prefix: &str, confirm: &dyn Confirm) -> Result<OperationReport> {
        let prefix = ensure_trailing_slash(session_prefix);

        if self.classifier.local_status(&prefix)? != LocalSessionStatus::Preprocessed {
            return Err(RegistryError::Precondition {
                operation: "upload",
                session: prefix,
                reason: "no preprocessing results found locally".to_string(),
            });
        }

        if self.classifier.remote_status(&prefix)? == RemoteSessionStatus::Preprocessed {
            let question = format!(
                "Session {} already contains preprocessing results remotely. \
                 Do you want to upload preprocessing results again?",
                prefix
            );
            if !confirm.confirm(&question) {
                info!(session = %prefix, "upload of preprocessing results canceled");
                return self.report(&prefix, Outcome::Declined);
            }
        }

        let dir = self.classifier.local_dir(&prefix);
        let filters = upload_filters()?;
        info!(session = %prefix, dir = %dir.display(), "uploading preprocessing results");
        self.store
            .sync_up(&dir, &prefix, &filters)
            .map_err(RegistryError::store("upload", &prefix))?;
        info!(session = %prefix, "upload complete");

        self.report(&prefix, Outcome::Completed)
    }

    fn report(&self, prefix: &str, outcome: Outcome) -> Result<OperationReport> {
        Ok(OperationReport {
            session_prefix: prefix.to_string(),
            outcome,
            local: self.classifier.local_status(prefix)?,
            remote: self.classifier.remote_status(prefix)?,
        })
    }
}
