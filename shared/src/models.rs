use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's price bar for a symbol.
///
/// `date` is the key within a symbol's history. The derived columns are
/// optional: `None` means the value has not been computed yet, while a
/// present non-finite `change_ratio` records a zero open price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub turnover: Option<f64>,
    #[serde(default)]
    pub price_change: Option<f64>,
    #[serde(default)]
    pub change_ratio: Option<f64>,
}

impl Bar {
    /// A raw bar with no derived columns.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
            turnover: None,
            price_change: None,
            change_ratio: None,
        }
    }

    pub fn has_derived_fields(&self) -> bool {
        self.turnover.is_some() && self.price_change.is_some() && self.change_ratio.is_some()
    }
}

/// Inclusive date range filter used against a symbol's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of days between the two ends (`to - from`).
    pub fn span_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }
}
