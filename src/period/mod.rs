//! Reporting periods: which months a refresh covers and the matching date range.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::BarsError;

/// The period choice offered to the user. The discriminant is the stored index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PeriodSelector {
    /// January through the current month.
    #[default]
    Automatic,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl PeriodSelector {
    pub const ALL: [PeriodSelector; 4] = [
        PeriodSelector::Automatic,
        PeriodSelector::ThisMonth,
        PeriodSelector::LastMonth,
        PeriodSelector::ThisYear,
    ];

    /// Maps a stored index back to a selector; unknown indexes mean `Automatic`.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => PeriodSelector::ThisMonth,
            2 => PeriodSelector::LastMonth,
            3 => PeriodSelector::ThisYear,
            _ => PeriodSelector::Automatic,
        }
    }

    pub fn index(self) -> i64 {
        match self {
            PeriodSelector::Automatic => 0,
            PeriodSelector::ThisMonth => 1,
            PeriodSelector::LastMonth => 2,
            PeriodSelector::ThisYear => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodSelector::Automatic => "Automatic",
            PeriodSelector::ThisMonth => "This Month",
            PeriodSelector::LastMonth => "Last Month",
            PeriodSelector::ThisYear => "This Year",
        }
    }

    /// Parses a label case-insensitively, ignoring spaces, dashes and underscores.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let wanted: String = raw
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        Self::ALL.into_iter().find(|selector| {
            selector.label().replace(' ', "").to_lowercase() == wanted
        })
    }

    /// Resolves the selector against `today`.
    pub fn resolve(self, today: NaiveDate) -> PeriodSelection {
        let this_month = today.month();
        let this_year = today.year();
        let (start_month, year, month_count) = match self {
            PeriodSelector::ThisMonth => (this_month, this_year, 1),
            PeriodSelector::LastMonth if this_month == 1 => (12, this_year - 1, 1),
            PeriodSelector::LastMonth => (this_month - 1, this_year, 1),
            PeriodSelector::ThisYear => (1, this_year, 12),
            PeriodSelector::Automatic => (1, this_year, this_month),
        };
        PeriodSelection {
            start_month,
            year,
            month_count,
        }
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The months a refresh covers. Always within a single calendar year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodSelection {
    pub start_month: u32,
    pub year: i32,
    pub month_count: u32,
}

impl PeriodSelection {
    pub fn months(&self) -> impl Iterator<Item = u32> {
        self.start_month..self.start_month + self.month_count
    }

    pub fn end_month(&self) -> u32 {
        self.start_month + self.month_count - 1
    }

    /// Half-open window from the first day of the start month to the first day
    /// after the last month.
    pub fn window(&self) -> DateWindow {
        let start = first_of_month(self.year, self.start_month);
        let end = first_of_next_month(self.year, self.end_month());
        DateWindow { start, end }
    }
}

/// A half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BarsError> {
        if end <= start {
            return Err(BarsError::InvalidInput(
                "window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last day inside the window.
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.end)
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn first_of_next_month(year: i32, month: u32) -> NaiveDate {
    if month >= 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    }
}

/// Clock abstracts access to the current timestamp so refreshes stay deterministic in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolves_each_selector_mid_year() {
        let today = date(2024, 7, 15);
        let cases = [
            (PeriodSelector::Automatic, 1, 2024, 7),
            (PeriodSelector::ThisMonth, 7, 2024, 1),
            (PeriodSelector::LastMonth, 6, 2024, 1),
            (PeriodSelector::ThisYear, 1, 2024, 12),
        ];
        for (selector, start_month, year, month_count) in cases {
            assert_eq!(
                selector.resolve(today),
                PeriodSelection {
                    start_month,
                    year,
                    month_count
                },
                "{selector}"
            );
        }
    }

    #[test]
    fn last_month_in_january_wraps_to_previous_december() {
        let selection = PeriodSelector::LastMonth.resolve(date(2024, 1, 10));
        assert_eq!(selection.start_month, 12);
        assert_eq!(selection.year, 2023);
        assert_eq!(selection.month_count, 1);
        assert_eq!(selection.window().start, date(2023, 12, 1));
        assert_eq!(selection.window().end, date(2024, 1, 1));
    }

    #[test]
    fn window_covers_whole_months() {
        let window = PeriodSelector::Automatic.resolve(date(2024, 2, 3)).window();
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.last_day(), date(2024, 2, 29));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 3, 1)));
    }

    #[test]
    fn index_and_label_round_trip() {
        for selector in PeriodSelector::ALL {
            assert_eq!(PeriodSelector::from_index(selector.index()), selector);
            assert_eq!(PeriodSelector::parse_label(selector.label()), Some(selector));
        }
        assert_eq!(PeriodSelector::from_index(42), PeriodSelector::Automatic);
        assert_eq!(PeriodSelector::parse_label("last-month"), Some(PeriodSelector::LastMonth));
        assert_eq!(PeriodSelector::parse_label("fortnight"), None);
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(DateWindow::new(date(2024, 3, 1), date(2024, 3, 1)).is_err());
    }
}
