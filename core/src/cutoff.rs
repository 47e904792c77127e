use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use tracing::info;

/// Most recent Sunday on or before `now`'s UTC day. On a Sunday this is the
/// Sunday of the previous week, never today.
pub fn last_sunday(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    let back = match today.weekday().num_days_from_sunday() {
        0 => 7,
        n => n,
    };

    // subtracting at most 7 days from a chrono date cannot leave its range
    today - Days::new(u64::from(back))
}

/// `last_sunday` rendered as `YYYY-MM-DD`, the form stored in `crtdDt`.
pub fn cutoff_date(now: DateTime<Utc>) -> String {
    let sunday = last_sunday(now);
    info!("Extracting data for {}", sunday);
    sunday.format("%Y-%m-%d").to_string()
}
