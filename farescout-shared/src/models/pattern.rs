use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trip shape a date pattern describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    Weekend,
    OneWeek,
    TwoWeeks,
    Custom,
}

/// Abstract, recurring trip shape ("any weekend", "a 10-day window")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatePattern {
    #[serde(rename = "type")]
    pub kind: PatternKind,

    /// Trip length in days. Ignored for weekends; 0 falls back to the
    /// default length of `oneWeek` / `twoWeeks`.
    #[serde(default)]
    pub duration: u32,

    /// Allowed outbound weekdays, 0 = Sunday .. 6 = Saturday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_days: Option<Vec<u8>>,

    /// +/- days the traveller can shift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flexibility: Option<i32>,
}

impl DatePattern {
    pub fn new(kind: PatternKind, duration: u32) -> Self {
        Self {
            kind,
            duration,
            preferred_days: None,
            flexibility: None,
        }
    }

    pub fn weekend() -> Self {
        Self::new(PatternKind::Weekend, 2)
    }

    pub fn with_preferred_days(mut self, days: Vec<u8>) -> Self {
        self.preferred_days = Some(days);
        self
    }
}

/// A concrete outbound/return pair derived from a pattern
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub outbound: NaiveDate,
    #[serde(rename = "return")]
    pub return_date: NaiveDate,
    pub label: String,
}

impl DateRange {
    pub fn nights(&self) -> i64 {
        (self.return_date - self.outbound).num_days()
    }
}
