//! Rolling-window technical indicators over `SeriesPoint` series.
//!
//! - `moving_average`: trailing simple moving average
//! - `rsi`: Wilder relative strength index
//! - `Overlay`: a named, coloured point series handed to the chart sink
//! - `IndicatorType`: indicator identity + parameters, used for labels
//!
//! All functions are pure and keep no state between calls. Warm-up points are
//! omitted rather than padded, so outputs are shorter than their inputs.

pub mod rsi;
pub mod sma;

pub use rsi::{rsi, DEFAULT_RSI_PERIOD, RSI_LOWER_LEVEL, RSI_UPPER_LEVEL};
pub use sma::moving_average;

use crate::domain::candle::SeriesPoint;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

/// Display-only line series.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: String,
    pub color: String,
    pub indicator: IndicatorType,
    pub points: Vec<SeriesPoint>,
}

impl Overlay {
    pub fn new(id: &str, color: &str, indicator: IndicatorType, points: Vec<SeriesPoint>) -> Self {
        Self {
            id: id.to_string(),
            color: color.to_string(),
            indicator,
            points,
        }
    }
}
