use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Parse a server timestamp into an instant.
///
/// Total over all inputs: `None` input, empty strings, and garbage all
/// return `None`. Callers treat an unparsable follow-up as "no follow-up
/// set," never as an error. Accepts RFC 3339 and the server's
/// timezone-less `YYYY-MM-DDTHH:MM:SS[.frac]` form, which is stored as
/// naive UTC server-side and interpreted as UTC here.
pub fn parse_instant(iso: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = iso?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}

/// Whole days until `instant`, as a ceiling: 25 hours out is 2 days,
/// 1 hour out is 1 day, anything in the past (or right now) is <= 0.
pub fn days_until_at(instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (instant - now).num_milliseconds();
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    ms.div_euclid(DAY_MS) + if ms.rem_euclid(DAY_MS) > 0 { 1 } else { 0 }
}

pub fn days_until(instant: DateTime<Utc>) -> i64 {
    days_until_at(instant, Utc::now())
}

/// A follow-up is overdue when it exists and its deadline has arrived.
/// Absent follow-ups are never overdue.
pub fn is_overdue_at(instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match instant {
        Some(i) => days_until_at(i, now) <= 0,
        None => false,
    }
}

pub fn is_overdue(instant: Option<DateTime<Utc>>) -> bool {
    is_overdue_at(instant, Utc::now())
}

/// Follow-up right now. Anchored to the current moment, preserving
/// time-of-day: "Today" means this time today.
pub fn follow_up_now() -> DateTime<Utc> {
    Utc::now()
}

/// Follow-up N days out at the current time of day: "Tomorrow" means this
/// time tomorrow, not midnight.
pub fn follow_up_in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Render a follow-up instant the way the PATCH endpoint expects it:
/// seconds precision, no timezone suffix.
pub fn format_follow_up(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S").to_string()
}
