//! Session registry and lifecycle engine for recorded observer sessions

mod aggregate;
mod config;
mod confirm;
pub mod decode;
mod error;
mod orchestrator;
mod preprocess;
mod registry;
mod status;
mod timezone;
mod walker;

pub use aggregate::{SessionAggregator, SessionDetails};
pub use config::{Config, DEFAULT_BUCKET, DEFAULT_PROFILE, DEFAULT_TIMEZONE};
pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use decode::{Decoders, ProtobufDecoders};
pub use error::{RegistryError, Result};
pub use orchestrator::{upload_filters, OperationReport, Outcome, SyncOrchestrator};
pub use preprocess::{CommandPreprocessor, Preprocessor};
pub use registry::{Registry, SessionSummary};
pub use status::{LocalSessionStatus, RemoteSessionStatus, StatusClassifier};
pub use timezone::{canonical_zone, TimezonePrompt, TimezoneResolver};
pub use walker::{PrefixWalker, CONTAINER_DEPTH};

pub use chrono_tz::Tz;
