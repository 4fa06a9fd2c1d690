//! Weekend bucketing: every weekend is identified by its Saturday date.
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Key format used for weekend stamps, e.g. `2026-02-14`.
const KEY_FORMAT: &str = "%Y-%m-%d";

/// Whether `date` falls on a Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The Saturday identifying the weekend `date` belongs to. A Sunday maps
/// back to the day before; a weekday maps forward to the upcoming Saturday
/// (the weekend the UI is counting toward).
#[must_use]
pub fn weekend_saturday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date,
        Weekday::Sun => date - Duration::days(1),
        other => {
            let until_saturday = i64::from(Weekday::Sat.num_days_from_monday())
                - i64::from(other.num_days_from_monday());
            date + Duration::days(until_saturday)
        }
    }
}

/// The stamp key for the weekend `date` belongs to.
#[must_use]
pub fn weekend_key(date: NaiveDate) -> String {
    weekend_saturday(date).format(KEY_FORMAT).to_string()
}

/// The stamp key for the weekend immediately before the one `date` belongs
/// to. Used by the streak rule to test weekend adjacency.
#[must_use]
pub fn previous_weekend_key(date: NaiveDate) -> String {
    (weekend_saturday(date) - Duration::days(7))
        .format(KEY_FORMAT)
        .to_string()
}
