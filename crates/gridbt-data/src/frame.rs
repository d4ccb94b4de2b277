//! Row and table types shared between the catalog, the evaluator seam and
//! the result store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One market observation for a single instrument on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day.
    pub date: NaiveDate,
    /// Instrument symbol.
    pub symbol: String,
    /// Opening price.
    pub open: f64,
    /// Daily high.
    pub high: f64,
    /// Daily low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

/// One evaluated trade in a result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Trading day the position was held.
    pub date: NaiveDate,
    /// Instrument symbol.
    pub symbol: String,
    /// Opening price of the bar.
    pub open: f64,
    /// Daily high of the bar.
    pub high: f64,
    /// Daily low of the bar.
    pub low: f64,
    /// Closing price of the bar.
    pub close: f64,
    /// Quantity traded.
    pub qty: f64,
    /// Realized profit for the row.
    pub profit: f64,
}

/// A named, immutable table of market observations for one universe.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Universe key, derived from the source file stem.
    pub universe: String,
    /// Observations, fully loaded into memory.
    pub bars: Vec<Bar>,
}

impl Dataset {
    /// Creates a dataset from its universe key and rows.
    pub fn new(universe: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            universe: universe.into(),
            bars,
        }
    }
}
