//! SMA crossover backtest engine.
//!
//! Long-only, single position. The fast and slow averages are aligned on the
//! slow average's timestamps; a golden cross opens the position at that bar's
//! close and a death cross closes it. A position still open after the last
//! bar is closed at the final candle's close.

use serde::Serialize;

use crate::domain::candle::{close_points, Candle, SeriesPoint};
use crate::domain::error::SimtraderError;
use crate::domain::indicator::moving_average;
use crate::domain::metrics::Metrics;

pub const MIN_SMA_WINDOW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Entry,
    Exit,
}

/// Chart annotation for one state transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub time: i64,
    pub kind: MarkerKind,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_time: i64,
    pub exit_time: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_pct: f64,
}

impl Trade {
    pub fn new(entry_time: i64, entry_price: f64, exit_time: i64, exit_price: f64) -> Self {
        Self {
            entry_time,
            exit_time,
            entry_price,
            exit_price,
            pnl_pct: (exit_price - entry_price) / entry_price * 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub markers: Vec<Marker>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionState {
    Flat,
    Long { entry_time: i64, entry_price: f64 },
}

fn validate_window(field: &str, value: usize) -> Result<(), SimtraderError> {
    if value < MIN_SMA_WINDOW {
        return Err(SimtraderError::invalid(
            field,
            format!("must be at least {MIN_SMA_WINDOW}, got {value}"),
        ));
    }
    Ok(())
}

/// Trade prices divide by the entry close, so every close must be a finite
/// positive number.
fn validate_closes(candles: &[Candle]) -> Result<(), SimtraderError> {
    match candles
        .iter()
        .position(|c| !c.close.is_finite() || c.close <= 0.0)
    {
        Some(i) => Err(SimtraderError::invalid(
            "candles",
            format!("close at index {i} must be positive and finite, got {}", candles[i].close),
        )),
        None => Ok(()),
    }
}

pub fn backtest_sma_crossover(
    candles: &[Candle],
    fast: usize,
    slow: usize,
) -> Result<BacktestResult, SimtraderError> {
    validate_window("fast", fast)?;
    validate_window("slow", slow)?;
    validate_closes(candles)?;

    if fast >= slow {
        tracing::warn!(fast, slow, "fast window not below slow window, no signals possible");
        return Ok(BacktestResult::default());
    }

    let closes = close_points(candles);
    let slow_series = moving_average(&closes, slow)?;
    if slow_series.is_empty() {
        return Ok(BacktestResult::default());
    }
    let fast_full = moving_average(&closes, fast)?;
    let fast_series: &[SeriesPoint] = &fast_full[slow - fast..];
    // Aligned index k corresponds to candle slow - 1 + k.
    let bars: &[Candle] = &candles[slow - 1..];

    let mut trades = Vec::new();
    let mut markers = Vec::new();
    let mut state = PositionState::Flat;

    for k in 1..slow_series.len() {
        let (f_prev, s_prev) = (fast_series[k - 1].value, slow_series[k - 1].value);
        let (f_cur, s_cur) = (fast_series[k].value, slow_series[k].value);
        let bar = &bars[k];

        match state {
            PositionState::Flat if f_prev <= s_prev && f_cur > s_cur => {
                markers.push(Marker {
                    time: bar.time,
                    kind: MarkerKind::Entry,
                    price: bar.close,
                });
                state = PositionState::Long {
                    entry_time: bar.time,
                    entry_price: bar.close,
                };
            }
            PositionState::Long {
                entry_time,
                entry_price,
            } if f_prev >= s_prev && f_cur < s_cur => {
                markers.push(Marker {
                    time: bar.time,
                    kind: MarkerKind::Exit,
                    price: bar.close,
                });
                trades.push(Trade::new(entry_time, entry_price, bar.time, bar.close));
                state = PositionState::Flat;
            }
            _ => {}
        }
    }

    if let PositionState::Long {
        entry_time,
        entry_price,
    } = state
    {
        let last = &bars[bars.len() - 1];
        markers.push(Marker {
            time: last.time,
            kind: MarkerKind::Exit,
            price: last.close,
        });
        trades.push(Trade::new(entry_time, entry_price, last.time, last.close));
    }

    let metrics = Metrics::compute(&trades);
    tracing::debug!(
        fast,
        slow,
        trades = trades.len(),
        total_return_pct = metrics.total_return_pct,
        "backtest complete"
    );

    Ok(BacktestResult {
        trades,
        markers,
        metrics,
    })
}
