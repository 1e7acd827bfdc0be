//! Calendar features derived from a measurement timestamp.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Weekday axis order for day-by-hour rollups: fixed calendar order,
/// never alphabetical or first-seen.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English day name for a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Full English month name, 1-based. Panics on 0 or > 12; month values
/// only ever come from chrono, which stays in range.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => panic!("month out of range: {month}"),
    }
}

/// Calendar features derived once per record at ingest.
///
/// Local/naive time throughout; no timezone conversion is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFeatures {
    pub date: NaiveDate,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub weekday: Weekday,
}

impl TimeFeatures {
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> TimeFeatures {
        let date = timestamp.date();
        TimeFeatures {
            date,
            hour: timestamp.hour(),
            month: date.month(),
            weekday: date.weekday(),
        }
    }

    /// Full English day name for this record's weekday.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}
