//! Year-month reference for the first projected period

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::YearMonthError;

/// Calendar month, used as the label origin for period 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    /// 1-12
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside 1-12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing today's local date
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Month `periods` after this one
    pub fn offset(&self, periods: u32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(periods);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Short display label such as `Jan 2026`
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }

    /// Labels for `count` consecutive periods starting here
    pub fn labels(&self, count: u32) -> Vec<String> {
        (0..count).map(|m| self.offset(m).label()).collect()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || YearMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let ym: YearMonth = "2025-03".parse().unwrap();
        assert_eq!(ym.year(), 2025);
        assert_eq!(ym.month(), 3);
        assert_eq!(ym.to_string(), "2025-03");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_offset_wraps_year() {
        let ym = YearMonth::new(2025, 11).unwrap();
        assert_eq!(ym.offset(0), ym);
        assert_eq!(ym.offset(2), YearMonth::new(2026, 1).unwrap());
        assert_eq!(ym.offset(26), YearMonth::new(2028, 1).unwrap());
    }

    #[test]
    fn test_labels() {
        let ym = YearMonth::new(2025, 12).unwrap();
        assert_eq!(ym.labels(2), vec!["Dec 2025".to_string(), "Jan 2026".to_string()]);
    }

    #[test]
    fn test_serde_as_string() {
        let ym = YearMonth::new(2024, 7).unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2024-07\"");
        let back: YearMonth = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, ym);
    }
}
