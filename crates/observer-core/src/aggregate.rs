//! Per-session metadata built from object keys and marker files

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use observer_naming::{
    ensure_trailing_slash, is_derived_artifact, parse_timestamp, session_basename, DataStreamKind,
};
use observer_store::ObjectStore;
use tracing::debug;

use crate::decode::Decoders;
use crate::error::{RegistryError, Result};
use crate::timezone::TimezoneResolver;

/// Snapshot of one session's remote contents
///
/// Built fresh on every query. `start_time`, `first_timestamp`,
/// `last_timestamp` and `duration` are `None` when the session holds no
/// timestamped raw objects.
#[derive(Debug, Clone)]
pub struct SessionDetails {
    pub session_prefix: String,
    pub is_complete: bool,
    pub timezone: Tz,
    pub start_time: Option<DateTime<Tz>>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub duration: Option<TimeDelta>,
    pub num_keypresses: usize,
    pub num_audio_files: usize,
    pub num_screenshots: usize,
    /// Keys relative to the session prefix, in listing order
    pub object_keys: Vec<String>,
}

impl SessionDetails {
    pub fn name(&self) -> &str {
        session_basename(&self.session_prefix)
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_secs().map(|s| s / 60.0)
    }
}

pub struct SessionAggregator<'a> {
    store: &'a dyn ObjectStore,
    decoders: &'a dyn Decoders,
    resolver: &'a TimezoneResolver,
}

impl<'a> SessionAggregator<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        decoders: &'a dyn Decoders,
        resolver: &'a TimezoneResolver,
    ) -> Self {
        Self {
            store,
            decoders,
            resolver,
        }
    }

    pub fn get_details(&self, session_prefix: &str) -> Result<SessionDetails> {
        let prefix = ensure_trailing_slash(session_prefix);
        let listing = self
            .store
            .list_all(&prefix, None)
            .map_err(RegistryError::store("list session objects", &prefix))?;

        let mut is_complete = false;
        let mut embedded_zone: Option<String> = None;
        let mut first: Option<DateTime<Utc>> = None;
        let mut last: Option<DateTime<Utc>> = None;
        let mut num_keypresses = 0usize;
        let mut num_audio_files = 0usize;
        let mut num_screenshots = 0usize;
        let mut object_keys = Vec::with_capacity(listing.objects.len());

        for object in &listing.objects {
            let key = object.key.as_str();
            let relative = key.strip_prefix(&prefix).unwrap_or(key);
            // The session's own folder placeholder has nothing to record.
            if relative.is_empty() {
                continue;
            }
            object_keys.push(relative.to_string());

            // Folder placeholders and derived artifacts carry no timestamp.
            if key.ends_with('/') || is_derived_artifact(key) {
                continue;
            }

            let kind = DataStreamKind::from_key(key);
            match kind {
                DataStreamKind::AudioChunk => num_audio_files += 1,
                DataStreamKind::Screenshot => num_screenshots += 1,
                _ => {}
            }

            let stamp = parse_timestamp(key).map_err(|source| RegistryError::Naming {
                key: key.to_string(),
                source,
            })?;
            let instant = stamp.as_utc().ok_or_else(|| RegistryError::UnsupportedTimezone {
                key: key.to_string(),
            })?;

            first = Some(first.map_or(instant, |f| f.min(instant)));
            last = Some(last.map_or(instant, |l| l.max(instant)));

            match kind {
                DataStreamKind::SessionEndMarker => {
                    let bytes = self.fetch(key)?;
                    embedded_zone = self
                        .decoders
                        .session_timezone(&bytes)
                        .map_err(|source| RegistryError::Decode {
                            key: key.to_string(),
                            source,
                        })?;
                    is_complete = true;
                }
                DataStreamKind::KeypressLog => {
                    let bytes = self.fetch(key)?;
                    num_keypresses += self.decoders.count_keypresses(&bytes).map_err(|source| {
                        RegistryError::Decode {
                            key: key.to_string(),
                            source,
                        }
                    })?;
                }
                _ => {}
            }
        }

        let timezone = self.resolver.resolve(embedded_zone.as_deref())?;
        let duration = first.zip(last).map(|(f, l)| l - f);
        debug!(
            session = %prefix,
            objects = object_keys.len(),
            complete = is_complete,
            zone = timezone.name(),
            "aggregated session"
        );

        Ok(SessionDetails {
            session_prefix: prefix,
            is_complete,
            timezone,
            start_time: first.map(|f| f.with_timezone(&timezone)),
            first_timestamp: first,
            last_timestamp: last,
            duration,
            num_keypresses,
            num_audio_files,
            num_screenshots,
            object_keys,
        })
    }

    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.store
            .download(key)
            .map_err(RegistryError::store("download", key))
    }
}
