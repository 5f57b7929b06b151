//! Candle and series point representation.

use serde::Serialize;

/// One intraday OHLCV bar. `time` is unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    /// low <= min(open, close) <= max(open, close) <= high
    pub fn is_well_formed(&self) -> bool {
        let body_lo = self.open.min(self.close);
        let body_hi = self.open.max(self.close);
        self.low <= body_lo && body_hi <= self.high
    }
}

/// A single `(time, value)` sample exchanged with the indicator functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Closing prices of `candles` as a point series.
pub fn close_points(candles: &[Candle]) -> Vec<SeriesPoint> {
    candles
        .iter()
        .map(|c| SeriesPoint::new(c.time, c.close))
        .collect()
}
