//! Month and week arithmetic for calendar views.

use crate::constants::DAYS_PER_WEEK;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month (year + month), displayed and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| YearMonth { first })
            .ok_or_else(|| AppError::Entry(format!("Invalid month {}-{:02}", year, month)))
    }

    /// The month a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        YearMonth {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month. Saturates at `NaiveDate::MAX` for the final
    /// representable month.
    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive `[first, last]` bounds, as queried by range subscriptions.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.last_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::containing(date) == *self
    }

    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| YearMonth { first })
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| YearMonth { first })
            .unwrap_or(*self)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map(|first| YearMonth { first })
            .map_err(|e| AppError::Entry(format!("Invalid month '{}': {}", s, e)))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whole Monday-first weeks covering `month`, padded with days of the
/// neighbouring months. Padding is dropped where it would leave the
/// representable date range.
pub fn month_grid(month: YearMonth) -> Vec<Vec<NaiveDate>> {
    let first = month.first_day();
    let last = month.last_day();
    let start = first
        .checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_monday())))
        .unwrap_or(first);
    let end = last
        .checked_add_days(Days::new(
            6 - u64::from(last.weekday().num_days_from_monday()),
        ))
        .unwrap_or(last);

    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    days.chunks(DAYS_PER_WEEK).map(|week| week.to_vec()).collect()
}

/// Monday through Sunday of the week containing `date`. Near the ends of the
/// representable range the week is cut short.
pub fn week_of(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(date);
    monday.iter_days().take(DAYS_PER_WEEK).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bounds_handle_leap_february() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.bounds(), (date(2024, 2, 1), date(2024, 2, 29)));

        let feb = YearMonth::new(2023, 2).unwrap();
        assert_eq!(feb.last_day(), date(2023, 2, 28));
    }

    #[test]
    fn test_next_and_previous_cross_years() {
        let dec = YearMonth::new(2023, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2024, 1).unwrap());
        assert_eq!(dec.next().previous(), dec);
    }

    #[test]
    fn test_containing_and_contains() {
        let march = YearMonth::containing(date(2024, 3, 15));
        assert_eq!(march, YearMonth::new(2024, 3).unwrap());
        assert!(march.contains(date(2024, 3, 31)));
        assert!(!march.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_parse_and_display() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(month.to_string(), "2024-03");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!(YearMonth::new(2024, 0).is_err());
    }

    #[test]
    fn test_month_grid_is_whole_monday_weeks() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let grid = month_grid(YearMonth::new(2024, 3).unwrap());
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|week| week.len() == 7));
        assert_eq!(grid[0][0], date(2024, 2, 26));
        assert_eq!(grid[0][0].weekday(), Weekday::Mon);
        assert_eq!(grid[4][6], date(2024, 3, 31));
    }

    #[test]
    fn test_week_of_starts_monday() {
        let week = week_of(date(2024, 3, 15));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], date(2024, 3, 11));
        assert_eq!(week[6], date(2024, 3, 17));

        // A Monday is the first day of its own week.
        assert_eq!(week_of(date(2024, 3, 11))[0], date(2024, 3, 11));
    }

    #[test]
    fn test_grid_and_week_at_range_edges() {
        let earliest = YearMonth::containing(NaiveDate::MIN);
        let grid = month_grid(earliest);
        assert_eq!(grid[0][0], NaiveDate::MIN);
        assert!(grid.concat().contains(&earliest.last_day()));
        assert_eq!(week_of(NaiveDate::MIN)[0], NaiveDate::MIN);

        let latest = YearMonth::containing(NaiveDate::MAX);
        assert_eq!(month_grid(latest).concat().last(), Some(&NaiveDate::MAX));
        assert_eq!(week_of(NaiveDate::MAX).last(), Some(&NaiveDate::MAX));

        let parsed: YearMonth = earliest.to_string().parse().unwrap();
        assert_eq!(month_grid(parsed)[0][0], NaiveDate::MIN);
    }
}
