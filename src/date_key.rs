//! Canonical date keys (`YYYY-MM-DD`)
//!
//! Every storage key, grid cell key and selection key in this crate goes through [`DateKey`],
//! so that "today" highlighting, document lookups and indicator entries can never disagree
//! on zero-padding or timezone handling.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar date, encoded as a zero-padded `YYYY-MM-DD` string.
///
/// This is the *local* calendar date, as displayed to the user: no UTC conversion happens
/// anywhere, so a task added late in the evening stays on the day it was added on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey {
    date: NaiveDate,
}

/// The error returned when parsing a string that is not a canonical date key
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("not a canonical YYYY-MM-DD date key: {0:?}")]
pub struct InvalidDateKey(pub String);

impl DateKey {
    /// The key for the current local calendar date
    pub fn today() -> Self {
        Self { date: Local::now().date_naive() }
    }

    /// Build a key from calendar components.
    /// Returns `None` for dates that do not exist (e.g. February 30th)
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Self { date })
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
    /// 1-based month
    pub fn month(&self) -> u32 {
        self.date.month()
    }
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{:04}-{:02}-{:02}", self.date.year(), self.date.month(), self.date.day())
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    /// The exact left inverse of [`Display`]: accepts only the canonical spelling,
    /// so that keys hand-built with inconsistent padding are caught early
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| InvalidDateKey(s.to_string()))?;
        let key = Self { date };
        if key.to_string() != s {
            return Err(InvalidDateKey(s.to_string()));
        }
        Ok(key)
    }
}

/// Used to support serde
impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<DateKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_zero_padded() {
        let key = DateKey::from_ymd(2024, 1, 5).unwrap();
        assert_eq!(key.to_string(), "2024-01-05");
    }

    #[test]
    fn decode_is_the_left_inverse_of_encode() {
        for (y, m, d) in [(2024, 1, 5), (2024, 12, 31), (1999, 2, 28), (2024, 2, 29)].iter() {
            let key = DateKey::from_ymd(*y, *m, *d).unwrap();
            assert_eq!(key.to_string().parse::<DateKey>().unwrap(), key);
        }
    }

    #[test]
    fn decode_rejects_non_canonical_keys() {
        assert!("2024-1-5".parse::<DateKey>().is_err());
        assert!("2024-01-5".parse::<DateKey>().is_err());
        assert!("05-01-2024".parse::<DateKey>().is_err());
        assert!("2024-01-05 ".parse::<DateKey>().is_err());
        assert!("2024-02-30".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let key = DateKey::from_ymd(2024, 3, 7).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03-07\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
