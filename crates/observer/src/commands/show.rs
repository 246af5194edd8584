use observer_core::SessionDetails;

use crate::cli::GlobalArgs;
use crate::commands::open_registry;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

pub fn run(global: &GlobalArgs, session: &str) -> anyhow::Result<()> {
    let registry = open_registry(global)?;
    let details = registry.get_details(session)?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&details_json(&details))?);
    } else {
        for line in describe(&details) {
            println!("{line}");
        }
    }
    Ok(())
}

fn details_json(details: &SessionDetails) -> serde_json::Value {
    serde_json::json!({
        "name": details.name(),
        "session_prefix": details.session_prefix,
        "is_complete": details.is_complete,
        "timezone": details.timezone.name(),
        "start_time": details.start_time.as_ref().map(|t| t.to_rfc3339()),
        "duration_secs": details.duration_secs(),
        "num_keypresses": details.num_keypresses,
        "num_audio_files": details.num_audio_files,
        "num_screenshots": details.num_screenshots,
        "object_keys": details.object_keys,
    })
}

fn describe(details: &SessionDetails) -> Vec<String> {
    let start = details
        .start_time
        .as_ref()
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    let duration = details
        .duration_minutes()
        .map(|m| format!("{:.2} min", m))
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        format!("Session:     {}", details.name()),
        format!("Prefix:      {}", details.session_prefix),
        format!("Complete:    {}", if details.is_complete { "yes" } else { "no" }),
        format!("Time zone:   {}", details.timezone.name()),
        format!("Start time:  {}", start),
        format!("Duration:    {}", duration),
        format!("Keypresses:  {}", details.num_keypresses),
        format!("Audio files: {}", details.num_audio_files),
        format!("Screenshots: {}", details.num_screenshots),
        format!("Objects ({}):", details.object_keys.len()),
    ];
    lines.extend(details.object_keys.iter().map(|key| format!("  {key}")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use observer_core::Tz;

    fn sample() -> SessionDetails {
        let first = Utc.with_ymd_and_hms(2023, 1, 1, 23, 58, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2023, 1, 2, 0, 2, 0).unwrap();
        SessionDetails {
            session_prefix: "c/session-001/".to_string(),
            is_complete: true,
            timezone: Tz::US__Central,
            start_time: Some(first.with_timezone(&Tz::US__Central)),
            first_timestamp: Some(first),
            last_timestamp: Some(last),
            duration: Some(TimeDelta::seconds(240)),
            num_keypresses: 3,
            num_audio_files: 1,
            num_screenshots: 1,
            object_keys: vec!["a.flac".to_string(), "b.jpg".to_string()],
        }
    }

    #[test]
    fn test_describe_lists_fields() {
        let lines = describe(&sample());
        assert_eq!(lines[0], "Session:     session-001");
        assert_eq!(lines[4], "Start time:  2023-01-01 17:58:00 CST");
        assert_eq!(lines[5], "Duration:    4.00 min");
        assert_eq!(lines.last().unwrap(), "  b.jpg");
    }

    #[test]
    fn test_describe_without_timestamps() {
        let details = SessionDetails {
            start_time: None,
            first_timestamp: None,
            last_timestamp: None,
            duration: None,
            ..sample()
        };
        let lines = describe(&details);
        assert_eq!(lines[4], "Start time:  -");
        assert_eq!(lines[5], "Duration:    -");
    }

    #[test]
    fn test_details_json() {
        let value = details_json(&sample());
        assert_eq!(value["name"], "session-001");
        assert_eq!(value["timezone"], "US/Central");
        assert_eq!(value["duration_secs"], 240.0);
        assert_eq!(value["start_time"], "2023-01-01T17:58:00-06:00");
        assert_eq!(value["object_keys"].as_array().unwrap().len(), 2);
    }
}
