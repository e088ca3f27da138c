//! Pay period models.
//!
//! This module contains [`MonthYear`], the identifier of a monthly pay period,
//! and [`PayPeriod`], the inclusive date range a payroll run covers together
//! with any dated holidays that fall inside it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month used as the key of a payroll run, formatted `YYYY-MM`.
///
/// The current period is always passed explicitly; nothing in the engine
/// reads an ambient "current month".
///
/// # Example
///
/// ```
/// use payroll_engine::models::MonthYear;
///
/// let month: MonthYear = "2025-02".parse().unwrap();
/// assert_eq!(month.to_string(), "2025-02");
/// assert_eq!(month.last_day().to_string(), "2025-02-28");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthYear {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl MonthYear {
    /// Creates a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = |message: &str| EngineError::InvalidPeriod {
            value: format!("{year:04}-{month:02}"),
            message: message.to_string(),
        };

        if !(1..=9999).contains(&year) {
            return Err(invalid("year must be between 1 and 9999"));
        }
        let first_day =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid("month must be 1-12"))?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| invalid("month end is out of range"))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// The following month.
    pub fn next(&self) -> EngineResult<Self> {
        if self.month() == 12 {
            Self::new(self.year() + 1, 1)
        } else {
            Self::new(self.year(), self.month() + 1)
        }
    }

    /// The pay period covering this whole month, without holidays.
    pub fn period(&self) -> PayPeriod {
        PayPeriod {
            start_date: self.first_day,
            end_date: self.last_day,
            holidays: vec![],
        }
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthYear {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| EngineError::InvalidPeriod {
            value: s.to_string(),
            message: message.to_string(),
        };

        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected format YYYY-MM"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid("expected format YYYY-MM"));
        }
        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthYear {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthYear> for String {
    fn from(value: MonthYear) -> Self {
        value.to_string()
    }
}

/// A dated non-working day, such as a public holiday.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
///     name: "Republic Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// Day counts for a pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDayCounts {
    /// Calendar days in the period.
    pub calendar_days: u32,
    /// Days that are neither a non-working weekday nor a holiday.
    pub working_days: u32,
    /// Sundays in the period.
    pub sunday_count: u32,
}

/// Represents a pay period with its date range and the holidays inside it.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Holiday, PayPeriod};
/// use chrono::NaiveDate;
///
/// let pay_period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     holidays: vec![Holiday {
///         date: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
///         name: "Republic Day".to_string(),
///     }],
/// };
///
/// assert!(pay_period.contains_date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
/// assert!(pay_period.is_holiday(NaiveDate::from_ymd_opt(2025, 1, 26).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
    /// Holidays that fall within this pay period.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if a given date is one of this period's holidays.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.date == date)
    }

    /// Returns the dates of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    /// Number of days shared between this period and `[start, end]`, inclusive.
    ///
    /// Returns zero when the ranges do not intersect or `end < start`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::MonthYear;
    /// use chrono::NaiveDate;
    ///
    /// let period = MonthYear::new(2025, 3).unwrap().period();
    /// let start = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    /// assert_eq!(period.overlap_days(start, end), 10);
    /// ```
    pub fn overlap_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let from = start.max(self.start_date);
        let to = end.min(self.end_date);
        if to < from {
            0
        } else {
            (to - from).num_days() + 1
        }
    }

    /// Number of distinct Monday-starting weeks that intersect the period.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::MonthYear;
    ///
    /// // March 2025 starts on a Saturday and ends on a Monday.
    /// let period = MonthYear::new(2025, 3).unwrap().period();
    /// assert_eq!(period.weeks_overlapping(), 6);
    /// ```
    pub fn weeks_overlapping(&self) -> u32 {
        if self.end_date < self.start_date {
            return 0;
        }
        let week_start = |d: NaiveDate| {
            d - chrono::Duration::days(i64::from(d.weekday().num_days_from_monday()))
        };
        let first = week_start(self.start_date);
        let last = week_start(self.end_date);
        ((last - first).num_days() / 7 + 1) as u32
    }

    /// Counts calendar, working and Sunday days for the period.
    ///
    /// A working day is any day whose weekday is not in `non_working_weekdays`
    /// and which is not a holiday.
    pub fn day_counts(&self, non_working_weekdays: &[Weekday]) -> PeriodDayCounts {
        let mut counts = PeriodDayCounts {
            calendar_days: 0,
            working_days: 0,
            sunday_count: 0,
        };
        for day in self.days() {
            counts.calendar_days += 1;
            if day.weekday() == Weekday::Sun {
                counts.sunday_count += 1;
            }
            if !non_working_weekdays.contains(&day.weekday()) && !self.is_holiday(day) {
                counts.working_days += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month_year() {
        let month: MonthYear = "2024-12".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 12);
        assert_eq!(month.first_day(), date(2024, 12, 1));
        assert_eq!(month.last_day(), date(2024, 12, 31));
    }

    #[test]
    fn test_leap_february_ends_on_29th() {
        let month = MonthYear::new(2024, 2).unwrap();
        assert_eq!(month.last_day(), date(2024, 2, 29));
    }

    #[test]
    fn test_parse_rejects_bad_formats() {
        for bad in ["2024", "2024-13", "2024-00", "24-01", "2024-1", "abcd-ef", ""] {
            let result = bad.parse::<MonthYear>();
            assert!(
                matches!(result, Err(EngineError::InvalidPeriod { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_next_rolls_over_year() {
        let december = MonthYear::new(2024, 12).unwrap();
        assert_eq!(december.next().unwrap(), MonthYear::new(2025, 1).unwrap());
    }

    #[test]
    fn test_month_year_serializes_as_string() {
        let month = MonthYear::new(2025, 7).unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2025-07\"");
        let back: MonthYear = serde_json::from_str("\"2025-07\"").unwrap();
        assert_eq!(back, month);
        assert!(serde_json::from_str::<MonthYear>("\"2025-7\"").is_err());
    }

    #[test]
    fn test_month_ordering_follows_calendar() {
        let a = MonthYear::new(2024, 12).unwrap();
        let b = MonthYear::new(2025, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_contains_date_inclusive() {
        let period = MonthYear::new(2025, 1).unwrap().period();
        assert!(period.contains_date(date(2025, 1, 1)));
        assert!(period.contains_date(date(2025, 1, 31)));
        assert!(!period.contains_date(date(2024, 12, 31)));
        assert!(!period.contains_date(date(2025, 2, 1)));
    }

    #[test]
    fn test_overlap_days_disjoint_is_zero() {
        let period = MonthYear::new(2025, 1).unwrap().period();
        assert_eq!(period.overlap_days(date(2025, 2, 1), date(2025, 2, 28)), 0);
        assert_eq!(period.overlap_days(date(2025, 1, 20), date(2025, 1, 10)), 0);
    }

    #[test]
    fn test_overlap_days_covering_range_is_whole_period() {
        let period = MonthYear::new(2025, 1).unwrap().period();
        assert_eq!(period.overlap_days(date(2024, 12, 1), date(2025, 3, 31)), 31);
    }

    #[test]
    fn test_weeks_overlapping_february_2021() {
        // 2021-02-01 is a Monday and 2021-02-28 a Sunday: exactly four weeks.
        let period = MonthYear::new(2021, 2).unwrap().period();
        assert_eq!(period.weeks_overlapping(), 4);
    }

    #[test]
    fn test_weeks_overlapping_january_2025() {
        // 2025-01-01 is a Wednesday, 2025-01-31 a Friday.
        let period = MonthYear::new(2025, 1).unwrap().period();
        assert_eq!(period.weeks_overlapping(), 5);
    }

    #[test]
    fn test_day_counts_sunday_only() {
        // January 2025 has four Sundays (5, 12, 19, 26).
        let period = MonthYear::new(2025, 1).unwrap().period();
        let counts = period.day_counts(&[Weekday::Sun]);
        assert_eq!(counts.calendar_days, 31);
        assert_eq!(counts.sunday_count, 4);
        assert_eq!(counts.working_days, 27);
    }

    #[test]
    fn test_day_counts_excludes_holidays() {
        let mut period = MonthYear::new(2025, 1).unwrap().period();
        period.holidays.push(Holiday {
            date: date(2025, 1, 1),
            name: "New Year".to_string(),
        });
        // A holiday that falls on a Sunday is not subtracted twice.
        period.holidays.push(Holiday {
            date: date(2025, 1, 26),
            name: "Republic Day".to_string(),
        });
        let counts = period.day_counts(&[Weekday::Sun]);
        assert_eq!(counts.working_days, 26);
        assert_eq!(counts.sunday_count, 4);
    }

    #[test]
    fn test_day_counts_all_days_non_working() {
        let period = MonthYear::new(2025, 1).unwrap().period();
        let all = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        assert_eq!(period.day_counts(&all).working_days, 0);
    }

    #[test]
    fn test_deserialize_pay_period_without_holidays() {
        let json = r#"{ "start_date": "2025-01-01", "end_date": "2025-01-31" }"#;
        let period: PayPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.start_date, date(2025, 1, 1));
        assert!(period.holidays.is_empty());
    }
}
