use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::anyhow;
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

const TIMEZONE_CONFIG_FILE: &str = "coursework-time.toml";
const TIMEZONE_ENV_VAR: &str = "COURSEWORK_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str = "COURSEWORK_TIME_CONFIG";
const DEFAULT_DISPLAY_TIMEZONE: &str = "America/New_York";

// Deadlines are shown the way the upstream feed's web UI shows them:
// abbreviated month, 12-hour clock, no zero padding.
const DEADLINE_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
    timezone: Option<String>,
    time: Option<TimezoneSection>,
}

#[derive(Debug, Deserialize)]
struct TimezoneSection {
    timezone: Option<String>,
}

pub fn display_timezone() -> &'static Tz {
    static DISPLAY_TZ: OnceLock<Tz> = OnceLock::new();
    DISPLAY_TZ.get_or_init(resolve_display_timezone)
}

#[must_use]
pub fn format_deadline(dt: DateTime<Utc>) -> String {
    dt.with_timezone(display_timezone())
        .format(DEADLINE_FORMAT)
        .to_string()
}

#[tracing::instrument(fields(input = raw))]
pub fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(anyhow!("empty timestamp"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(token, format) {
            return to_utc_from_display_local(naive, token);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("failed to construct midnight for {token}"))?;
        return to_utc_from_display_local(midnight, token);
    }

    Err(anyhow!("unrecognized timestamp: {token}"))
}

fn resolve_display_timezone() -> Tz {
    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR) {
        if let Some(tz) = parse_timezone(&raw, TIMEZONE_ENV_VAR) {
            return tz;
        }
    }

    if let Some(path) = timezone_config_path()
        && let Some(tz) = load_timezone_from_file(&path)
    {
        return tz;
    }

    parse_timezone(DEFAULT_DISPLAY_TIMEZONE, "DEFAULT_DISPLAY_TIMEZONE").unwrap_or_else(|| {
        tracing::error!("failed to parse fallback timezone; using UTC");
        chrono_tz::UTC
    })
}

fn timezone_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(TIMEZONE_CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(TIMEZONE_CONFIG_FILE))
}

fn load_timezone_from_file(path: &PathBuf) -> Option<Tz> {
    if !path.exists() {
        tracing::debug!(file = %path.display(), "timezone config file not found");
        return None;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(
                file = %path.display(),
                error = %err,
                "failed reading timezone config file"
            );
            return None;
        }
    };

    let parsed = match toml::from_str::<TimezoneConfig>(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!(
                file = %path.display(),
                error = %err,
                "failed parsing timezone config file"
            );
            return None;
        }
    };

    let timezone = parsed
        .timezone
        .or_else(|| parsed.time.and_then(|section| section.timezone));
    let Some(timezone) = timezone else {
        tracing::warn!(file = %path.display(), "timezone config had no timezone field");
        return None;
    };

    parse_timezone(timezone.as_str(), &format!("file:{}", path.display()))
}

fn parse_timezone(raw: &str, source: &str) -> Option<Tz> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::warn!(source, "timezone source was empty");
        return None;
    }

    match trimmed.parse::<Tz>() {
        Ok(tz) => {
            tracing::info!(source, timezone = %trimmed, "configured display timezone");
            Some(tz)
        }
        Err(err) => {
            tracing::error!(
                source,
                timezone = %trimmed,
                error = %err,
                "failed to parse timezone id"
            );
            None
        }
    }
}

fn to_utc_from_display_local(
    local_naive: NaiveDateTime,
    context: &str,
) -> anyhow::Result<DateTime<Utc>> {
    match display_timezone().from_local_datetime(&local_naive) {
        LocalResult::Single(local_dt) => Ok(local_dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            tracing::warn!(
                context,
                first = %first,
                second = %second,
                "ambiguous local datetime; using earliest"
            );
            let chosen = if first <= second { first } else { second };
            Ok(chosen.with_timezone(&Utc))
        }
        LocalResult::None => Err(anyhow!(
            "local datetime does not exist in display timezone: {context}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{format_deadline, parse_timestamp};

    #[test]
    fn formats_abbreviated_month_twelve_hour() {
        let dt = Utc
            .with_ymd_and_hms(2023, 5, 1, 14, 30, 0)
            .single()
            .expect("valid instant");
        // 14:30 UTC is 10:30 in America/New_York during DST.
        assert_eq!(format_deadline(dt), "May 1, 2023, 10:30 AM");
    }

    #[test]
    fn formats_pm_without_zero_padding() {
        let dt = Utc
            .with_ymd_and_hms(2023, 12, 3, 22, 5, 0)
            .single()
            .expect("valid instant");
        assert_eq!(format_deadline(dt), "Dec 3, 2023, 5:05 PM");
    }

    #[test]
    fn parses_rfc3339() {
        let parsed = parse_timestamp("2023-05-01T14:30:00Z").expect("parse rfc3339");
        let expected = Utc
            .with_ymd_and_hms(2023, 5, 1, 14, 30, 0)
            .single()
            .expect("valid instant");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parses_naive_datetime_in_display_timezone() {
        let parsed = parse_timestamp("2023-01-15T09:00:00").expect("parse naive");
        // 09:00 Eastern standard time is 14:00 UTC.
        let expected = Utc
            .with_ymd_and_hms(2023, 1, 15, 14, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_garbage_and_empty_input() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("   ").is_err());
    }
}
