//! Session time zone resolution
//!
//! Sessions normally record a Windows-style display name such as
//! "(UTC-06:00) Central Time (US & Canada)". Sessions without one fall back
//! to a zone supplied out of band, asked for at most once per resolver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use chrono_tz::Tz;
use tracing::{info, warn};

use crate::error::{RegistryError, Result};

/// Display-name fragments and the canonical zone each maps to
const CANONICAL_ZONES: [(&str, &str, Tz); 2] = [
    ("Eastern Time (US & Canada)", "US/Eastern", Tz::US__Eastern),
    ("Central Time (US & Canada)", "US/Central", Tz::US__Central),
];

/// Map an embedded display name to its canonical zone
pub fn canonical_zone(name: &str) -> Option<Tz> {
    CANONICAL_ZONES
        .iter()
        .find(|(display, id, _)| name.contains(display) || name == *id)
        .map(|(_, _, tz)| *tz)
}

/// Supplies a zone name when a session carries none
pub type TimezonePrompt = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Resolves session time zones, remembering the manual fallback
pub struct TimezoneResolver {
    prompt: TimezonePrompt,
    default_zone: Tz,
    manual: OnceLock<Tz>,
    prompts: AtomicUsize,
}

impl TimezoneResolver {
    pub fn new(default_zone: Tz, prompt: TimezonePrompt) -> Self {
        Self {
            prompt,
            default_zone,
            manual: OnceLock::new(),
            prompts: AtomicUsize::new(0),
        }
    }

    /// Resolver whose fallback is always the default zone
    pub fn with_default(default_zone: Tz) -> Self {
        Self::new(default_zone, Box::new(|| None))
    }

    /// Resolve the zone for a session's embedded name, if any
    pub fn resolve(&self, embedded: Option<&str>) -> Result<Tz> {
        match embedded.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => canonical_zone(name).ok_or_else(|| RegistryError::UnrecognizedTimezone {
                name: name.to_string(),
            }),
            None => Ok(self.manual_zone()),
        }
    }

    /// The out-of-band zone, asking the prompt on first use only
    pub fn manual_zone(&self) -> Tz {
        *self.manual.get_or_init(|| {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            let answer = (self.prompt)();
            self.parse_manual(answer.as_deref())
        })
    }

    /// How many times the prompt has been consulted
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    fn parse_manual(&self, answer: Option<&str>) -> Tz {
        let Some(name) = answer.map(str::trim).filter(|name| !name.is_empty()) else {
            info!(zone = %self.default_zone.name(), "no time zone given, using default");
            return self.default_zone;
        };

        if let Some(tz) = canonical_zone(name) {
            return tz;
        }
        match name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    entered = name,
                    zone = %self.default_zone.name(),
                    "unknown time zone entered, using default"
                );
                self.default_zone
            }
        }
    }
}
