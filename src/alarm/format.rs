use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use shared::{AppError, Result};

use super::event::AlarmNotification;

/// `StateChangeTime` as CloudWatch writes it, e.g. `2024-01-15T10:30:00.000+0000`.
pub const STATE_CHANGE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// 12-hour clock with the zone abbreviation, e.g. `2024-01-15 12:30:00 PM EET`.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p %Z";

/// Parse a `StateChangeTime`. The fractional seconds are mandatory.
pub fn parse_state_change_time(value: &str) -> Result<DateTime<FixedOffset>> {
    let time = DateTime::parse_from_str(value, STATE_CHANGE_TIME_FORMAT)
        .map_err(|e| AppError::timestamp_parse(value, e.to_string()))?;

    // `%.f` also matches an absent fraction.
    if !has_fraction(value) {
        return Err(AppError::timestamp_parse(value, "missing fractional seconds"));
    }
    Ok(time)
}

fn has_fraction(value: &str) -> bool {
    value
        .split_once('T')
        .is_some_and(|(_, clock)| clock.contains('.'))
}

pub fn format_local_time(time: &DateTime<FixedOffset>, tz: Tz) -> String {
    time.with_timezone(&tz).format(DISPLAY_TIME_FORMAT).to_string()
}

/// Render the Slack text for one alarm.
///
/// Fails on an unparseable `StateChangeTime`, which keeps a bad message
/// from ever reaching the webhook.
pub fn render_message(alarm: &AlarmNotification, tz: Tz) -> Result<String> {
    let raw_time = alarm.state_change_time.as_deref().unwrap_or_default();
    let local_time = format_local_time(&parse_state_change_time(raw_time)?, tz);

    Ok(format!(
        "*CloudWatch Alarm State Change*\n\
         *Alarm:* {}\n\
         *State:* {}\n\
         *Reason:* {}\n\
         *Time:* {}",
        alarm.alarm_name(),
        alarm.state(),
        alarm.reason(),
        local_time
    ))
}
