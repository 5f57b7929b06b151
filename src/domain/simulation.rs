//! End-to-end simulation: generate candles, derive overlays and RSI, run the
//! crossover backtest.
//!
//! A run either returns a fully populated `SimulationResult` or an error;
//! there is no partially computed result.

use crate::domain::backtest::{backtest_sma_crossover, BacktestResult};
use crate::domain::candle::{close_points, Candle, SeriesPoint};
use crate::domain::error::SimtraderError;
use crate::domain::generator::{generate, GeneratorParams};
use crate::domain::indicator::{
    moving_average, rsi, IndicatorType, Overlay, DEFAULT_RSI_PERIOD, RSI_LOWER_LEVEL,
    RSI_UPPER_LEVEL,
};

pub const FAST_OVERLAY_COLOR: &str = "#2dd4bf";
pub const SLOW_OVERLAY_COLOR: &str = "#f97316";

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub symbol: String,
    pub generator: GeneratorParams,
    pub fast: usize,
    pub slow: usize,
    pub rsi_period: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            generator: GeneratorParams::default(),
            fast: 9,
            slow: 21,
            rsi_period: DEFAULT_RSI_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiLevels {
    pub upper: f64,
    pub lower: f64,
}

impl Default for RsiLevels {
    fn default() -> Self {
        Self {
            upper: RSI_UPPER_LEVEL,
            lower: RSI_LOWER_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub overlays: Vec<Overlay>,
    pub rsi: Vec<SeriesPoint>,
    pub rsi_levels: RsiLevels,
    pub backtest: BacktestResult,
}

pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResult, SimtraderError> {
    let candles = generate(&config.generator)?;
    let closes = close_points(&candles);

    let overlays = vec![
        Overlay::new(
            "fast",
            FAST_OVERLAY_COLOR,
            IndicatorType::Sma(config.fast),
            moving_average(&closes, config.fast)?,
        ),
        Overlay::new(
            "slow",
            SLOW_OVERLAY_COLOR,
            IndicatorType::Sma(config.slow),
            moving_average(&closes, config.slow)?,
        ),
    ];
    let rsi_points = rsi(&closes, config.rsi_period)?;
    tracing::debug!(
        overlays = overlays.len(),
        rsi_points = rsi_points.len(),
        indicator = %IndicatorType::Rsi(config.rsi_period),
        "indicators computed"
    );

    let backtest = backtest_sma_crossover(&candles, config.fast, config.slow)?;

    tracing::info!(
        symbol = %config.symbol,
        seed = config.generator.seed,
        bars = candles.len(),
        trades = backtest.trades.len(),
        "simulation complete"
    );

    Ok(SimulationResult {
        symbol: config.symbol.clone(),
        candles,
        overlays,
        rsi: rsi_points,
        rsi_levels: RsiLevels::default(),
        backtest,
    })
}
