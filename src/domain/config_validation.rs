//! Configuration validation.
//!
//! Validates all config fields before a simulation runs. Missing keys are
//! allowed (defaults apply); present keys must parse and be in range.

use std::str::FromStr;

use crate::domain::backtest::MIN_SMA_WINDOW;
use crate::domain::error::SimtraderError;
use crate::domain::generator::parse_start_time;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    validate_bars(config)?;
    validate_minutes(config)?;
    validate_interval(config)?;
    validate_start_price(config)?;
    validate_drift_volatility(config)?;
    validate_seed(config)?;
    validate_start_time(config)?;
    validate_windows(config)?;
    validate_rsi_period(config)?;
    Ok(())
}

/// Parse `[section] key` as `T`. `Ok(None)` when the key is absent or blank.
pub fn parse_value<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, SimtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("cannot parse {:?}", s.trim()))),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SimtraderError {
    SimtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn require_at_least(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    minimum: i64,
) -> Result<(), SimtraderError> {
    match parse_value::<i64>(config, section, key)? {
        Some(value) if value < minimum => Err(invalid(
            section,
            key,
            format!("{key} must be at least {minimum}"),
        )),
        _ => Ok(()),
    }
}

fn validate_bars(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    require_at_least(config, "simulation", "bars", 1)
}

fn validate_minutes(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    require_at_least(config, "simulation", "minutes", 1)
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    require_at_least(config, "simulation", "interval_minutes", 1)?;
    match parse_value::<i64>(config, "simulation", "interval_minutes")? {
        Some(value) if value > i64::from(u32::MAX) => Err(invalid(
            "simulation",
            "interval_minutes",
            "interval_minutes is too large",
        )),
        _ => Ok(()),
    }
}

fn validate_start_price(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    match parse_value::<f64>(config, "simulation", "start_price")? {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(invalid(
            "simulation",
            "start_price",
            "start_price must be positive",
        )),
        _ => Ok(()),
    }
}

fn validate_drift_volatility(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    for key in ["drift", "volatility"] {
        if let Some(value) = parse_value::<f64>(config, "simulation", key)? {
            if !value.is_finite() {
                return Err(invalid("simulation", key, format!("{key} must be finite")));
            }
        }
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    parse_value::<u64>(config, "simulation", "seed")
        .map_err(|_| invalid("simulation", "seed", "seed must be a non-negative integer"))?;
    Ok(())
}

fn validate_start_time(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    match config.get_string("simulation", "start_time") {
        Some(value) if !value.trim().is_empty() => parse_start_time(&value)
            .map(|_| ())
            .map_err(|_| {
                invalid(
                    "simulation",
                    "start_time",
                    "start_time must be an RFC 3339 timestamp",
                )
            }),
        _ => Ok(()),
    }
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    require_at_least(config, "strategy", "fast", MIN_SMA_WINDOW as i64)?;
    require_at_least(config, "strategy", "slow", MIN_SMA_WINDOW as i64)?;
    Ok(())
}

fn validate_rsi_period(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    require_at_least(config, "indicators", "rsi_period", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid_key(content: &str, expected: &str) {
        let err = validate_simulation_config(&make_config(content)).unwrap_err();
        assert!(
            matches!(&err, SimtraderError::ConfigInvalid { key, .. } if key == expected),
            "expected invalid {expected}, got {err}"
        );
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[simulation]
symbol = AAPL
bars = 390
interval_minutes = 1
start_price = 200
drift = 0.0002
volatility = 0.01
seed = 42
start_time = 2024-01-02T14:30:00Z

[strategy]
fast = 9
slow = 21

[indicators]
rsi_period = 14
"#,
        );
        assert!(validate_simulation_config(&config).is_ok());
    }

    #[test]
    fn empty_config_passes() {
        assert!(validate_simulation_config(&make_config("[simulation]\n")).is_ok());
    }

    #[test]
    fn bars_zero_fails() {
        assert_invalid_key("[simulation]\nbars = 0\n", "bars");
    }

    #[test]
    fn bars_non_numeric_fails() {
        assert_invalid_key("[simulation]\nbars = many\n", "bars");
    }

    #[test]
    fn minutes_negative_fails() {
        assert_invalid_key("[simulation]\nminutes = -30\n", "minutes");
    }

    #[test]
    fn interval_zero_fails() {
        assert_invalid_key("[simulation]\ninterval_minutes = 0\n", "interval_minutes");
    }

    #[test]
    fn start_price_zero_fails() {
        assert_invalid_key("[simulation]\nstart_price = 0\n", "start_price");
    }

    #[test]
    fn start_price_negative_fails() {
        assert_invalid_key("[simulation]\nstart_price = -1.5\n", "start_price");
    }

    #[test]
    fn volatility_nan_fails() {
        assert_invalid_key("[simulation]\nvolatility = NaN\n", "volatility");
    }

    #[test]
    fn negative_seed_fails() {
        assert_invalid_key("[simulation]\nseed = -1\n", "seed");
    }

    #[test]
    fn bad_start_time_fails() {
        assert_invalid_key("[simulation]\nstart_time = 2024/01/02 09:30\n", "start_time");
    }

    #[test]
    fn blank_start_time_uses_default() {
        let config = make_config("[simulation]\nstart_time =\n");
        assert!(validate_simulation_config(&config).is_ok());
    }

    #[test]
    fn fast_below_two_fails() {
        assert_invalid_key("[strategy]\nfast = 1\nslow = 21\n", "fast");
    }

    #[test]
    fn slow_below_two_fails() {
        assert_invalid_key("[strategy]\nfast = 9\nslow = 0\n", "slow");
    }

    #[test]
    fn inverted_windows_pass_validation() {
        let config = make_config("[strategy]\nfast = 21\nslow = 9\n");
        assert!(validate_simulation_config(&config).is_ok());
    }

    #[test]
    fn rsi_period_zero_fails() {
        assert_invalid_key("[indicators]\nrsi_period = 0\n", "rsi_period");
    }

    #[test]
    fn parse_value_blank_is_none() {
        let config = make_config("[simulation]\nbars =\n");
        assert_eq!(parse_value::<i64>(&config, "simulation", "bars").unwrap(), None);
    }
}
