//! Simple moving average.
//!
//! SMA(n)[j] = sum(values[j..j+n]) / n, stamped with the time of the last
//! value in the window. Each window is summed left to right so results are
//! reproducible bit for bit.

use crate::domain::candle::SeriesPoint;
use crate::domain::error::SimtraderError;

pub fn moving_average(
    points: &[SeriesPoint],
    window: usize,
) -> Result<Vec<SeriesPoint>, SimtraderError> {
    if window < 1 {
        return Err(SimtraderError::invalid("window", "must be at least 1"));
    }

    Ok(points
        .windows(window)
        .map(|w| {
            let sum: f64 = w.iter().map(|p| p.value).sum();
            SeriesPoint::new(w[window - 1].time, sum / window as f64)
        })
        .collect())
}
