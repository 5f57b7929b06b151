//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first n points produce no output (n changes are needed for
//! the initial average).

use crate::domain::candle::SeriesPoint;
use crate::domain::error::SimtraderError;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const RSI_UPPER_LEVEL: f64 = 70.0;
pub const RSI_LOWER_LEVEL: f64 = 30.0;

pub fn rsi(points: &[SeriesPoint], period: usize) -> Result<Vec<SeriesPoint>, SimtraderError> {
    if period < 1 {
        return Err(SimtraderError::invalid("period", "must be at least 1"));
    }
    if points.len() <= period {
        return Ok(Vec::new());
    }

    let mut gains: Vec<f64> = Vec::with_capacity(points.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(points.len() - 1);
    for pair in points.windows(2) {
        let change = pair[1].value - pair[0].value;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;

    let mut values = Vec::with_capacity(points.len() - period);
    values.push(SeriesPoint::new(
        points[period].time,
        rsi_value(avg_gain, avg_loss),
    ));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i]) / n;
        values.push(SeriesPoint::new(
            points[i + 1].time,
            rsi_value(avg_gain, avg_loss),
        ));
    }

    Ok(values)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    (100.0 - (100.0 / (1.0 + avg_gain / avg_loss))).clamp(0.0, 100.0)
}
