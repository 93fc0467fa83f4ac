//! Source of "today" for `datePublished` stamps.

use chrono::{Local, NaiveDate};

/// Date format used for `datePublished`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supplies the current date to crate builders.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Today's date as `YYYY-MM-DD`.
    fn date_published(&self) -> String {
        self.today().format(DATE_FORMAT).to_string()
    }
}

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date, for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_formats_iso_date() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(clock.date_published(), "2024-03-07");
    }

    #[test]
    fn system_clock_has_date_shape() {
        let stamp = SystemClock.date_published();
        assert_eq!(stamp.len(), 10);
        assert!(NaiveDate::parse_from_str(&stamp, DATE_FORMAT).is_ok());
    }
}
