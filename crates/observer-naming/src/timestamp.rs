//! Timestamps embedded in recorded file names
//!
//! The recorder writes `yyyyMMddTHHmmssfff[Z]-<Stream>.<ext>`; older tooling
//! also produced `yyyy-MM-ddTHH-mm-ss[.fff][Z]-<Stream>.<ext>`. A `Z` right
//! after the time marks the timestamp as UTC.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;

use crate::error::NamingError;
use crate::stream::file_name;

static TIMESTAMP_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn timestamp_regex() -> &'static Regex {
    TIMESTAMP_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?P<compact>\d{8}T\d{6})(?P<cfrac>\d{1,6})?|(?P<dashed>\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2})(?:\.(?P<dfrac>\d{1,6}))?)(?P<utc>Z?)-(?P<stream>[A-Za-z0-9]+)",
        )
        .unwrap()
    })
}

/// Timestamp parsed from a file name, with its UTC flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimestamp {
    pub time: NaiveDateTime,
    pub is_utc: bool,
}

impl FileTimestamp {
    /// The instant this timestamp denotes, if it is tagged UTC
    pub fn as_utc(&self) -> Option<DateTime<Utc>> {
        self.is_utc.then(|| self.time.and_utc())
    }
}

/// Parse the timestamp and UTC flag from an object key or file name
pub fn parse_timestamp(key: &str) -> Result<FileTimestamp, NamingError> {
    let name = file_name(key);
    let caps = timestamp_regex()
        .captures(name)
        .ok_or_else(|| NamingError::NoTimestamp(name.to_string()))?;

    let (raw, format, frac) = if let Some(m) = caps.name("compact") {
        (m.as_str(), "%Y%m%dT%H%M%S", caps.name("cfrac"))
    } else if let Some(m) = caps.name("dashed") {
        (m.as_str(), "%Y-%m-%dT%H-%M-%S", caps.name("dfrac"))
    } else {
        return Err(NamingError::NoTimestamp(name.to_string()));
    };

    let invalid = || NamingError::InvalidTimestamp {
        name: name.to_string(),
        timestamp: raw.to_string(),
    };

    let mut time = NaiveDateTime::parse_from_str(raw, format).map_err(|_| invalid())?;
    if let Some(frac) = frac {
        time += fraction_to_delta(frac.as_str()).ok_or_else(invalid)?;
    }

    let is_utc = caps.name("utc").is_some_and(|m| !m.as_str().is_empty());
    Ok(FileTimestamp { time, is_utc })
}

/// Sub-second digits as a duration: "5" is 500ms, "123" is 123ms
fn fraction_to_delta(digits: &str) -> Option<TimeDelta> {
    let value: i64 = digits.parse().ok()?;
    let scale = 10i64.checked_pow(9 - digits.len() as u32)?;
    Some(TimeDelta::nanoseconds(value * scale))
}
