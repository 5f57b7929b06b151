#![allow(dead_code)]

use simtrader::domain::candle::Candle;
use simtrader::domain::generator::{GeneratorParams, DEFAULT_START_TIME};
use simtrader::domain::simulation::SimulationConfig;

/// The 100-bar reference scenario: seed 42, one-minute bars, SMA(9)/SMA(21).
pub fn golden_params() -> GeneratorParams {
    GeneratorParams {
        bars: 100,
        interval_minutes: 1,
        start_price: 200.0,
        drift: 0.0002,
        volatility: 0.01,
        seed: 42,
        start_time: DEFAULT_START_TIME,
    }
}

pub fn golden_config() -> SimulationConfig {
    SimulationConfig {
        generator: golden_params(),
        ..SimulationConfig::default()
    }
}

/// One-minute candles whose close follows `closes`; open is the previous close.
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let mut prev = closes.first().copied().unwrap_or(100.0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = prev;
            prev = close;
            Candle {
                time: DEFAULT_START_TIME + 60 * i as i64,
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Closes that fall, then rise, then fall again: one up-cross and one
/// down-cross for short windows.
pub fn swing_closes() -> Vec<f64> {
    let mut closes = Vec::new();
    closes.extend((0..10).map(|i| 110.0 - i as f64));
    closes.extend((0..10).map(|i| 101.0 + 2.0 * i as f64));
    closes.extend((0..10).map(|i| 119.0 - 2.0 * i as f64));
    closes
}

pub fn write_temp_config(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("simtrader.ini");
    std::fs::write(&path, content).unwrap();
    path
}
