//! Performance metrics over a closed-trade list.
//!
//! Every figure is expressed in percent and falls back to 0 when it is not
//! defined (no trades, a single trade, zero variance).

use super::backtest::Trade;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub win_rate_pct: f64,
    pub sharpe: f64,
    pub trade_count: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub largest_win_pct: f64,
    pub largest_loss_pct: f64,
}

impl Metrics {
    pub fn compute(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return Metrics::default();
        }

        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_pct).collect();
        let equity = compounded_equity(&returns);
        let final_equity = equity.last().copied().unwrap_or(1.0);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for &pnl in &returns {
            if pnl > 0.0 {
                trades_won += 1;
                if pnl > largest_win {
                    largest_win = pnl;
                }
            } else if pnl < 0.0 {
                trades_lost += 1;
                if pnl.abs() > largest_loss {
                    largest_loss = pnl.abs();
                }
            }
        }

        Metrics {
            total_return_pct: (final_equity - 1.0) * 100.0,
            max_drawdown_pct: max_drawdown(&equity) * 100.0,
            win_rate_pct: 100.0 * trades_won as f64 / trades.len() as f64,
            sharpe: sharpe(&returns),
            trade_count: trades.len(),
            trades_won,
            trades_lost,
            largest_win_pct: largest_win,
            largest_loss_pct: largest_loss,
        }
    }
}

/// Equity after each trade, compounding from 1.0.
fn compounded_equity(returns_pct: &[f64]) -> Vec<f64> {
    let mut equity = 1.0_f64;
    returns_pct
        .iter()
        .map(|r| {
            equity *= 1.0 + r / 100.0;
            equity
        })
        .collect()
}

/// Largest peak-to-trough decline as a fraction. The starting equity of 1.0
/// counts as the first peak.
fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;

    for &value in equity {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Mean trade return over its sample standard deviation (ddof = 1).
fn sharpe(returns_pct: &[f64]) -> f64 {
    if returns_pct.len() < 2 {
        return 0.0;
    }

    let n = returns_pct.len() as f64;
    let mean = returns_pct.iter().sum::<f64>() / n;
    let variance = returns_pct.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 && stddev.is_finite() {
        mean / stddev
    } else {
        0.0
    }
}
