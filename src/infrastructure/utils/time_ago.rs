use chrono::{DateTime, Utc};

const INTERVALS: [(&str, i64); 6] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Relative label such as `3 days ago`, with `Just now` under a minute.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    for (unit, span) in INTERVALS {
        let count = seconds / span;
        if count >= 1 {
            return if count == 1 {
                format!("{count} {unit} ago")
            } else {
                format!("{count} {unit}s ago")
            };
        }
    }
    "Just now".to_string()
}
