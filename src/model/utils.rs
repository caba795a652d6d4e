use chrono::Duration as ChronoDuration;

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[must_use]
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Coarse age of a tendency snapshot, e.g. "3 days" or "1 week".
#[must_use]
pub fn format_data_age(td: ChronoDuration) -> String {
    let secs = td.num_seconds().max(0);

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;

    let (count, unit) = if secs >= MONTH {
        (secs / MONTH, "month")
    } else if secs >= WEEK {
        (secs / WEEK, "week")
    } else if secs >= DAY {
        (secs / DAY, "day")
    } else if secs >= HOUR {
        (secs / HOUR, "hour")
    } else if secs >= MINUTE {
        (secs / MINUTE, "minute")
    } else {
        (secs, "second")
    };

    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
