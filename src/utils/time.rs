use chrono::{DateTime, NaiveDate, Utc};

const SECS_PER_DAY: i64 = 86_400;

/// Whole days elapsed from `earlier` to `now`, floored and clamped at zero.
pub fn whole_days_since(earlier: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (now - earlier).num_seconds();
    if secs <= 0 {
        return 0;
    }
    secs / SECS_PER_DAY
}

/// Signed calendar-day distance from `today` to `date` (negative when `date` is past).
pub fn calendar_days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}
