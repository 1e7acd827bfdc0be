//! Shared utility functions for AQM crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a month given either as a number (1-12) or an English month
    /// name ("March", case-insensitive). The dashboards' month selector
    /// shows names, so the CLI accepts both.
    pub fn parse_month(s: &str) -> anyhow::Result<u32> {
        if let Ok(n) = s.parse::<u32>() {
            if (1..=12).contains(&n) {
                return Ok(n);
            }
            anyhow::bail!("month number out of range: {n}");
        }
        let lower = s.to_ascii_lowercase();
        let names = [
            "january",
            "february",
            "march",
            "april",
            "may",
            "june",
            "july",
            "august",
            "september",
            "october",
            "november",
            "december",
        ];
        match names.iter().position(|name| *name == lower) {
            Some(i) => Ok(i as u32 + 1),
            None => anyhow::bail!("unrecognized month: {s}"),
        }
    }

}
