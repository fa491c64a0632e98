//! Time utilities: due-date parsing and timezone-aware "today".

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Current calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parse a `YYYY-MM-DD` due date. Surrounding whitespace is ignored.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DUE_DATE_FORMAT).ok()
}

/// Whole days from `today` until `due`; negative when overdue.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}
