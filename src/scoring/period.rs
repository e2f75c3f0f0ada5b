// src/scoring/period.rs

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static PERIODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])$").expect("periode pattern is a valid regex")
});

/// Evaluation cycle, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Periode {
    year: i32,
    month: u32,
}

impl Periode {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(ValidationError::new(format!(
                "Invalid periode {}-{}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Whether this periode matches an optional year and month filter.
    pub fn matches(&self, year: Option<i32>, month: Option<u32>) -> bool {
        year.is_none_or(|y| y == self.year) && month.is_none_or(|m| m == self.month)
    }
}

impl FromStr for Periode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = PERIODE_PATTERN
            .captures(s.trim())
            .ok_or_else(|| ValidationError::new(format!("Periode must be YYYY-MM, got '{}'", s)))?;

        let year = caps[1]
            .parse::<i32>()
            .map_err(|e| ValidationError::new(e.to_string()))?;
        let month = caps[2]
            .parse::<u32>()
            .map_err(|e| ValidationError::new(e.to_string()))?;

        Periode::new(year, month)
    }
}

impl TryFrom<String> for Periode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Periode> for String {
    fn from(value: Periode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Periode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// `validator` hook for request DTOs carrying a raw periode string.
pub fn validate_periode(value: &str) -> Result<(), validator::ValidationError> {
    value
        .parse::<Periode>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("periode_must_be_yyyy_mm"))
}
