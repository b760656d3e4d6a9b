//! Human-readable times and durations for the item editing panel.

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Format a minute of day as a 12-hour clock time, e.g. `"1:00pm"`.
///
/// Values outside a day wrap around.
pub fn format_time(minute_of_day: i64) -> String {
    let minute_of_day = minute_of_day.rem_euclid(MINUTES_PER_DAY);
    let hour = minute_of_day / 60;
    let minute = minute_of_day % 60;
    let suffix = if hour < 12 { "am" } else { "pm" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02}{}", hour, minute, suffix)
}

/// Format a duration as `"45min"`, `"2h"` or `"1h 30min"`.
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}min", h, m),
    }
}

/// Parse a clock time into a minute of day.
///
/// Accepts `"10:30am"`, `"10am"`, `"10:30 PM"` and 24-hour `"14:30"`.
pub fn parse_time(input: &str) -> Option<i64> {
    let text = input.trim().to_ascii_lowercase();
    if text.is_empty() {
        return None;
    }

    let (clock, meridiem) = if let Some(rest) = text.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = text.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (text.as_str(), None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<i64>().ok()?, m.parse::<i64>().ok()?),
        None => (clock.parse::<i64>().ok()?, 0),
    };
    if !(0..60).contains(&minute) {
        return None;
    }

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            (hour % 12) + if pm { 12 } else { 0 }
        }
        None => {
            if !(0..24).contains(&hour) {
                return None;
            }
            hour
        }
    };

    Some(hour * 60 + minute)
}

/// Parse `"1h 30min"`, `"90min"`, `"2h"` or a bare number of minutes.
/// Anything longer than a day is rejected.
pub fn parse_duration(input: &str) -> Option<i64> {
    let text = input.trim().to_ascii_lowercase();
    if text.is_empty() {
        return None;
    }

    let mut total = 0i64;
    for token in text.split_whitespace() {
        let minutes = if let Some(value) = token.strip_suffix("min") {
            value.parse::<i64>().ok()?
        } else if let Some(value) = token.strip_suffix('h') {
            value.parse::<i64>().ok()?.checked_mul(60)?
        } else if let Some(value) = token.strip_suffix('m') {
            value.parse::<i64>().ok()?
        } else {
            token.parse::<i64>().ok()?
        };
        if minutes < 0 {
            return None;
        }
        total = total.checked_add(minutes)?;
    }
    (total <= MINUTES_PER_DAY).then_some(total)
}
