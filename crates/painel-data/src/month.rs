//! Month keys and month filtering.

use crate::columns;
use crate::error::{DataError, Result};
use crate::pipeline::UnifiedRecords;
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// strftime pattern used to derive the month column from the date column.
pub(crate) const MONTH_FORMAT: &str = "%Y-%m";

/// A calendar month, written `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display("{year:04}-{month:02}")]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidKey`] if the month is outside `1..=12` or
    /// the year is outside `0..=9999`.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(DataError::InvalidKey(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// Year of the month.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, `1..=12`.
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl FromStr for MonthKey {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DataError::InvalidKey(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Records whose month equals `month`, in their original relative order.
///
/// A month with no records yields an empty set.
pub fn filter_by_month(records: &UnifiedRecords, month: &MonthKey) -> Result<UnifiedRecords> {
    let frame = records
        .frame()
        .clone()
        .lazy()
        .filter(col(columns::MONTH).eq(lit(month.to_string())))
        .collect()?;

    UnifiedRecords::from_frame(frame)
}

/// Distinct months present in the records, sorted chronologically.
pub fn distinct_months(records: &UnifiedRecords) -> Result<Vec<MonthKey>> {
    let months = records.frame().column(columns::MONTH)?.str()?;

    let set = months
        .into_iter()
        .flatten()
        .map(MonthKey::from_str)
        .collect::<Result<BTreeSet<_>>>()?;

    Ok(set.into_iter().collect())
}

/// Month of the first record, if any.
pub fn first_month(records: &UnifiedRecords) -> Result<Option<MonthKey>> {
    let months = records.frame().column(columns::MONTH)?.str()?;

    months
        .into_iter()
        .flatten()
        .next()
        .map(MonthKey::from_str)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn records(months: &[&str]) -> UnifiedRecords {
        let profit: Vec<f64> = (0..months.len()).map(|i| i as f64).collect();
        let frame = df!(
            columns::MONTH => months,
            columns::PROFIT => profit,
        )
        .unwrap();
        UnifiedRecords::from_frame(frame).unwrap()
    }

    #[rstest]
    #[case("2024-01", 2024, 1)]
    #[case("1999-12", 1999, 12)]
    #[case("0001-06", 1, 6)]
    fn test_parse_valid(#[case] input: &str, #[case] year: i32, #[case] month: u32) {
        let key: MonthKey = input.parse().unwrap();
        assert_eq!(key.year(), year);
        assert_eq!(key.month(), month);
        assert_eq!(key.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("2024")]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("2024-1")]
    #[case("24-01")]
    #[case("2024/01")]
    #[case("2024-01-15")]
    #[case("+024-01")]
    #[case("abcd-ef")]
    fn test_parse_malformed(#[case] input: &str) {
        let err = input.parse::<MonthKey>().unwrap_err();
        assert!(matches!(err, DataError::InvalidKey(_)));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a: MonthKey = "2023-12".parse().unwrap();
        let b: MonthKey = "2024-01".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_as_string() {
        let key = MonthKey::new(2024, 3).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<MonthKey>("\"2024-3\"").is_err());
    }

    #[test]
    fn test_filter_preserves_order() {
        let all = records(&["2024-02", "2024-01", "2024-02", "2024-03", "2024-02"]);
        let feb = filter_by_month(&all, &"2024-02".parse().unwrap()).unwrap();

        assert_eq!(feb.len(), 3);
        let profit: Vec<f64> = feb
            .frame()
            .column(columns::PROFIT)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(profit, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_filter_unknown_month_is_empty() {
        let all = records(&["2024-01", "2024-02"]);
        let none = filter_by_month(&all, &"2030-01".parse().unwrap()).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_distinct_and_first_month() {
        let all = records(&["2024-02", "2024-01", "2024-02"]);
        let months = distinct_months(&all).unwrap();
        assert_eq!(
            months,
            vec![
                "2024-01".parse::<MonthKey>().unwrap(),
                "2024-02".parse().unwrap()
            ]
        );
        assert_eq!(first_month(&all).unwrap(), Some("2024-02".parse().unwrap()));
    }

    #[test]
    fn test_first_month_of_empty_set() {
        let empty = records(&[]);
        assert_eq!(first_month(&empty).unwrap(), None);
        assert!(distinct_months(&empty).unwrap().is_empty());
    }
}
