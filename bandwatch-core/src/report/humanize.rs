use chrono::{DateTime, Local, Utc};

const IEC_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

pub const ABSOLUTE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `1.5 GiB`, `512 B`. One decimal below ten units, none above.
pub fn format_iec(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exp = 0;
    let mut whole = bytes;
    while whole >= 1024 && exp < IEC_UNITS.len() - 1 {
        whole /= 1024;
        exp += 1;
    }

    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 10.0 + 0.5).floor() / 10.0;
    if rounded < 10.0 {
        format!("{rounded:.1} {}", IEC_UNITS[exp])
    } else {
        format!("{rounded:.0} {}", IEC_UNITS[exp])
    }
}

/// Local wall-clock time, or `-` when unknown.
pub fn format_absolute(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format(ABSOLUTE_TIME_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 12 * MONTH;

/// (upper bound in seconds, singular text, divisor for the plural form)
const MAGNITUDES: &[(i64, &str, i64)] = &[
    (2, "1 second", 0),
    (MINUTE, "seconds", 1),
    (2 * MINUTE, "1 minute", 0),
    (HOUR, "minutes", MINUTE),
    (2 * HOUR, "1 hour", 0),
    (DAY, "hours", HOUR),
    (2 * DAY, "1 day", 0),
    (WEEK, "days", DAY),
    (2 * WEEK, "1 week", 0),
    (MONTH, "weeks", WEEK),
    (2 * MONTH, "1 month", 0),
    (YEAR, "months", MONTH),
    (18 * MONTH, "1 year", 0),
    (2 * YEAR, "2 years", 0),
    (37 * YEAR, "years", YEAR),
];

/// `3 minutes ago`, `now`, `1 day from now`; `-` when unknown.
pub fn format_relative(time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(time) = time else {
        return "-".to_string();
    };

    let diff = now.signed_duration_since(time).num_seconds();
    let (secs, label) = if diff >= 0 {
        (diff, "ago")
    } else {
        (-diff, "from now")
    };

    if secs < 1 {
        return "now".to_string();
    }

    for &(bound, text, divisor) in MAGNITUDES {
        if secs < bound {
            return if divisor == 0 {
                format!("{text} {label}")
            } else {
                format!("{} {text} {label}", secs / divisor)
            };
        }
    }
    format!("a long while {label}")
}
