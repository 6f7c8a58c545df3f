use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of "now" and "today" for the workflow.
///
/// "Today" is the calendar date in the application time zone; leave dates are
/// compared against it as plain dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    time_zone: Tz,
    frozen_at: Option<DateTime<Utc>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::system(Tz::UTC)
    }
}

impl Clock {
    pub fn system(time_zone: Tz) -> Self {
        Self {
            time_zone,
            frozen_at: None,
        }
    }

    /// A clock pinned to `at`, for tests and previews.
    pub fn frozen(time_zone: Tz, at: DateTime<Utc>) -> Self {
        Self {
            time_zone,
            frozen_at: Some(at),
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }

    pub fn now_in_tz(&self) -> DateTime<Tz> {
        self.now().with_timezone(&self.time_zone)
    }

    pub fn today(&self) -> NaiveDate {
        self.now_in_tz().date_naive()
    }
}

/// Formats a date as `Jan 01, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Formats an inclusive range as `Jan 01, 2024 - Jan 10, 2024`.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_date(start), format_date(end))
}
