//! Upcoming-weekend date helpers.

use chrono::{Datelike, Duration, NaiveDate};

/// The next Saturday on or after `today`.
pub fn upcoming_saturday(today: NaiveDate) -> NaiveDate {
    let days = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(i64::from(days))
}

/// Saturday and Sunday of the upcoming weekend.
pub fn weekend_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let saturday = upcoming_saturday(today);
    (saturday, saturday + Duration::days(1))
}

/// `YYYY年MM月` label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y年%m月").to_string()
}
