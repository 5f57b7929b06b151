//! Deterministic synthetic intraday candle generator.
//!
//! The generator is canonical so that a `(params, seed)` pair reproduces the
//! same bits everywhere:
//!
//! - RNG: `ChaCha8Rng::seed_from_u64(seed)`, one instance per `generate` call.
//! - Uniform: `(next_u64 >> 11) * 2^-53`, in `[0, 1)`.
//! - Normal: Box-Muller, `sqrt(-2 ln(1 - u1)) * cos(TAU * u2)`.
//! - Per bar, in draw order: normal variate for the log-return, upper wick
//!   fraction, lower wick fraction, volume.
//!
//! Wicks widen the open/close body by up to `min(|volatility| / 2, 1/2)` of
//! the price on each side, so `low <= min(open, close) <= max(open, close) <=
//! high` holds by construction and `low` stays positive. A parameter set whose
//! price path leaves the finite positive range is rejected, never emitted.

use std::f64::consts::TAU;

use chrono::DateTime;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::candle::Candle;
use crate::domain::error::SimtraderError;

/// 2024-01-02T14:30:00Z, a US cash-session open.
pub const DEFAULT_START_TIME: i64 = 1_704_205_800;

pub const MIN_SESSION_BARS: usize = 50;
pub const MAX_SESSION_BARS: usize = 5_000;

const WICK_SCALE: f64 = 0.5;
const MAX_WICK: f64 = 0.5;
const VOLUME_BASE: f64 = 1_000.0;
const VOLUME_SPAN: f64 = 9_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub bars: usize,
    pub interval_minutes: u32,
    pub start_price: f64,
    pub drift: f64,
    pub volatility: f64,
    pub seed: u64,
    pub start_time: i64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            bars: 390,
            interval_minutes: 1,
            start_price: 200.0,
            drift: 0.0002,
            volatility: 0.01,
            seed: 42,
            start_time: DEFAULT_START_TIME,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), SimtraderError> {
        if self.bars < 1 {
            return Err(SimtraderError::invalid("bars", "must be at least 1"));
        }
        if self.interval_minutes < 1 {
            return Err(SimtraderError::invalid(
                "interval_minutes",
                "must be at least 1",
            ));
        }
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(SimtraderError::invalid(
                "start_price",
                format!("must be positive and finite, got {}", self.start_price),
            ));
        }
        if !self.drift.is_finite() {
            return Err(SimtraderError::invalid("drift", "must be finite"));
        }
        if !self.volatility.is_finite() {
            return Err(SimtraderError::invalid("volatility", "must be finite"));
        }
        Ok(())
    }

    fn step_seconds(&self) -> i64 {
        i64::from(self.interval_minutes) * 60
    }
}

/// Seeded source of uniform and normal variates.
pub struct PriceRng {
    inner: ChaCha8Rng,
}

impl PriceRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn uniform(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn standard_normal(&mut self) -> f64 {
        let u1 = 1.0 - self.uniform();
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

pub fn generate(params: &GeneratorParams) -> Result<Vec<Candle>, SimtraderError> {
    params.validate()?;

    let step = params.step_seconds();
    let last_offset = i64::try_from(params.bars - 1)
        .ok()
        .and_then(|n| n.checked_mul(step))
        .and_then(|off| params.start_time.checked_add(off));
    if last_offset.is_none() {
        return Err(SimtraderError::invalid(
            "bars",
            "timestamp range overflows for this interval",
        ));
    }

    let mut candles = Vec::new();
    candles.try_reserve_exact(params.bars).map_err(|e| {
        SimtraderError::invalid("bars", format!("cannot allocate {} bars: {e}", params.bars))
    })?;

    let mut rng = PriceRng::new(params.seed);
    let wick = (params.volatility.abs() * WICK_SCALE).min(MAX_WICK);
    let mut prev_close = params.start_price;

    for i in 0..params.bars {
        let open = prev_close;
        let z = rng.standard_normal();
        let close = open * (params.drift + params.volatility * z).exp();

        let body_hi = open.max(close);
        let body_lo = open.min(close);
        let high = body_hi * (1.0 + wick * rng.uniform());
        let low = body_lo * (1.0 - wick * rng.uniform());
        let volume = (VOLUME_BASE + (rng.uniform() * VOLUME_SPAN).floor()) as u64;

        if !(close.is_finite() && high.is_finite() && low > 0.0) {
            return Err(SimtraderError::invalid(
                "volatility",
                format!("price path leaves the finite positive range at bar {i}"),
            ));
        }

        candles.push(Candle {
            time: params.start_time + i as i64 * step,
            open,
            high,
            low,
            close,
            volume,
        });
        prev_close = close;
    }

    tracing::debug!(
        bars = candles.len(),
        seed = params.seed,
        first_close = candles.first().map(|c| c.close),
        last_close = candles.last().map(|c| c.close),
        "generated candle series"
    );

    Ok(candles)
}

/// Bar count for a session of `minutes` at `interval_minutes` per bar,
/// clamped to the displayable range. Caller-side helper; `generate` never
/// clamps.
pub fn session_bars(minutes: u32, interval_minutes: u32) -> Result<usize, SimtraderError> {
    if interval_minutes < 1 {
        return Err(SimtraderError::invalid(
            "interval_minutes",
            "must be at least 1",
        ));
    }
    let raw = (minutes / interval_minutes) as usize;
    Ok(raw.clamp(MIN_SESSION_BARS, MAX_SESSION_BARS))
}

/// Parse an RFC 3339 timestamp into unix seconds.
pub fn parse_start_time(value: &str) -> Result<i64, SimtraderError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.timestamp())
        .map_err(|e| SimtraderError::invalid("start_time", format!("{value}: {e}")))
}
