use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Local, NaiveDate};

/// This is the standard way of naming a month in shiftlog log files.
pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Human readable timestamp used for the FirstSave/LastSave entry fields.
pub fn timestamp_to_string(v: DateTime<Local>) -> String {
    v.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Formats a duration the way the log stores it: `H:MM:SS`, with a
/// microsecond fraction appended only when present.
pub fn format_timedelta(v: Duration) -> String {
    debug_assert!(
        v >= Duration::zero(),
        "shift durations are never negative"
    );
    let secs = v.num_seconds();
    let micros = (v - Duration::seconds(secs)).num_microseconds().unwrap_or(0);
    let hours = secs / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;
    if micros == 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}

/// Parses `H:MM:SS` or `H:MM:SS.ffffff` back into a duration.
pub fn parse_timedelta(s: &str) -> Result<Duration> {
    let mut parts = s.splitn(3, ':');
    let (Some(hours), Some(minutes), Some(rest)) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("expected H:MM:SS, got {s:?}");
    };
    let hours: i64 = hours.parse()?;
    let minutes: i64 = minutes.parse()?;
    let (seconds, fraction) = match rest.split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction)),
        None => (rest, None),
    };
    let seconds: i64 = seconds.parse()?;
    let micros: i64 = match fraction {
        Some(fraction) => {
            if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
                bail!("expected a decimal fraction of seconds, got {s:?}");
            }
            let mut padded = format!("{fraction:0<6}");
            padded.truncate(6);
            padded.parse()?
        }
        None => 0,
    };
    Ok(Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds)
        + Duration::microseconds(micros))
}
