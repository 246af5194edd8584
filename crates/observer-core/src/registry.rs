//! Registry facade owning the store and collaborators

use std::path::{Path, PathBuf};

use observer_store::ObjectStore;
use serde::Serialize;

use crate::aggregate::{SessionAggregator, SessionDetails};
use crate::config::Config;
use crate::confirm::Confirm;
use crate::decode::{Decoders, ProtobufDecoders};
use crate::error::Result;
use crate::orchestrator::{OperationReport, SyncOrchestrator};
use crate::preprocess::{CommandPreprocessor, Preprocessor};
use crate::status::{LocalSessionStatus, RemoteSessionStatus, StatusClassifier};
use crate::timezone::{TimezonePrompt, TimezoneResolver};
use crate::walker::PrefixWalker;

/// One row of a container's session listing
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Prefix relative to the container, e.g. `session-001/`
    pub session: String,
    /// Full prefix from the bucket root
    pub prefix: String,
    pub local: LocalSessionStatus,
    pub remote: RemoteSessionStatus,
}

pub struct Registry {
    store: Box<dyn ObjectStore>,
    config: Config,
    data_root: PathBuf,
    resolver: TimezoneResolver,
    decoders: Box<dyn Decoders>,
    preprocessor: Box<dyn Preprocessor>,
}

impl Registry {
    /// Registry with protobuf decoders, the configured preprocess command and
    /// no manual time zone prompt
    pub fn new(store: Box<dyn ObjectStore>, config: Config) -> Result<Self> {
        let data_root = config.data_root()?;
        let resolver = TimezoneResolver::with_default(config.default_zone()?);
        let preprocessor = CommandPreprocessor::new(&config.preprocess_command)?;

        Ok(Self {
            store,
            config,
            data_root,
            resolver,
            decoders: Box::new(ProtobufDecoders),
            preprocessor: Box::new(preprocessor),
        })
    }

    /// Ask `prompt` for a zone the first time a session lacks one
    pub fn with_timezone_prompt(mut self, prompt: TimezonePrompt) -> Result<Self> {
        self.resolver = TimezoneResolver::new(self.config.default_zone()?, prompt);
        Ok(self)
    }

    pub fn with_decoders(mut self, decoders: Box<dyn Decoders>) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: Box<dyn Preprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn resolver(&self) -> &TimezoneResolver {
        &self.resolver
    }

    pub fn walker(&self) -> PrefixWalker<'_> {
        PrefixWalker::new(self.store.as_ref(), self.config.schema_root())
    }

    pub fn aggregator(&self) -> SessionAggregator<'_> {
        SessionAggregator::new(self.store.as_ref(), self.decoders.as_ref(), &self.resolver)
    }

    pub fn classifier(&self) -> StatusClassifier<'_> {
        StatusClassifier::new(self.store.as_ref(), &self.data_root)
    }

    pub fn orchestrator(&self) -> SyncOrchestrator<'_> {
        SyncOrchestrator::new(
            self.store.as_ref(),
            self.classifier(),
            self.aggregator(),
            self.preprocessor.as_ref(),
        )
    }

    pub fn discover_containers(&self) -> Result<Vec<String>> {
        self.walker().discover_containers()
    }

    pub fn discover_sessions(&self, container: &str) -> Result<Vec<String>> {
        self.walker().discover_sessions(container)
    }

    /// Sessions under `container` with their current local and remote state
    pub fn list_sessions(&self, container: &str) -> Result<Vec<SessionSummary>> {
        let classifier = self.classifier();
        self.discover_sessions(container)?
            .into_iter()
            .map(|session| {
                let prefix = format!("{}{}", container, session);
                Ok(SessionSummary {
                    remote: classifier.remote_status(&prefix)?,
                    local: classifier.local_status(&prefix)?,
                    session,
                    prefix,
                })
            })
            .collect()
    }

    pub fn get_details(&self, session_prefix: &str) -> Result<SessionDetails> {
        self.aggregator().get_details(session_prefix)
    }

    pub fn local_dir(&self, session_prefix: &str) -> PathBuf {
        self.classifier().local_dir(session_prefix)
    }

    pub fn local_status(&self, session_prefix: &str) -> Result<LocalSessionStatus> {
        self.classifier().local_status(session_prefix)
    }

    pub fn remote_status(&self, session_prefix: &str) -> Result<RemoteSessionStatus> {
        self.classifier().remote_status(session_prefix)
    }

    pub fn download(&self, session_prefix: &str) -> Result<OperationReport> {
        self.orchestrator().download(session_prefix)
    }

    pub fn preprocess(&self, session_prefix: &str, confirm: &dyn Confirm) -> Result<OperationReport> {
        self.orchestrator().preprocess(session_prefix, confirm)
    }

    pub fn upload(&self, session_prefix: &str, confirm: &dyn Confirm) -> Result<OperationReport> {
        self.orchestrator().upload(session_prefix, confirm)
    }
}
