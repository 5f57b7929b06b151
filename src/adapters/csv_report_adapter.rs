//! CSV report adapter.
//!
//! Writes one file per chart layer into an output directory:
//! `candles.csv`, `overlays.csv`, `rsi.csv`, `markers.csv`, `trades.csv`,
//! `summary.csv`.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::domain::candle::Candle;
use crate::domain::error::SimtraderError;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct OverlayRow<'a> {
    id: &'a str,
    color: &'a str,
    indicator: String,
    time: i64,
    value: f64,
}

#[derive(Serialize)]
struct RsiRow {
    time: i64,
    value: f64,
    upper: f64,
    lower: f64,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    metric: &'a str,
    value: String,
}

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Serialize candles as CSV with a header row.
pub fn write_candles<W: io::Write>(writer: W, candles: &[Candle]) -> Result<(), SimtraderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for candle in candles {
        wtr.serialize(candle)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), SimtraderError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| SimtraderError::Report {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn summary_rows(result: &SimulationResult) -> Vec<SummaryRow<'static>> {
    let m = &result.backtest.metrics;
    vec![
        SummaryRow {
            metric: "symbol",
            value: result.symbol.clone(),
        },
        SummaryRow {
            metric: "bars",
            value: result.candles.len().to_string(),
        },
        SummaryRow {
            metric: "trades",
            value: m.trade_count.to_string(),
        },
        SummaryRow {
            metric: "total_return_pct",
            value: format!("{:.4}", m.total_return_pct),
        },
        SummaryRow {
            metric: "max_drawdown_pct",
            value: format!("{:.4}", m.max_drawdown_pct),
        },
        SummaryRow {
            metric: "win_rate_pct",
            value: format!("{:.4}", m.win_rate_pct),
        },
        SummaryRow {
            metric: "sharpe",
            value: format!("{:.4}", m.sharpe),
        },
    ]
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &SimulationResult, output: &Path) -> Result<(), SimtraderError> {
        fs::create_dir_all(output)?;

        let file = fs::File::create(output.join("candles.csv"))?;
        write_candles(file, &result.candles)?;

        write_rows(
            &output.join("overlays.csv"),
            result.overlays.iter().flat_map(|overlay| {
                overlay.points.iter().map(move |p| OverlayRow {
                    id: &overlay.id,
                    color: &overlay.color,
                    indicator: overlay.indicator.to_string(),
                    time: p.time,
                    value: p.value,
                })
            }),
        )?;

        write_rows(
            &output.join("rsi.csv"),
            result.rsi.iter().map(|p| RsiRow {
                time: p.time,
                value: p.value,
                upper: result.rsi_levels.upper,
                lower: result.rsi_levels.lower,
            }),
        )?;

        write_rows(&output.join("markers.csv"), &result.backtest.markers)?;
        write_rows(&output.join("trades.csv"), &result.backtest.trades)?;
        write_rows(&output.join("summary.csv"), summary_rows(result))?;

        tracing::debug!(output = %output.display(), "csv report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generator::GeneratorParams;
    use crate::domain::simulation::{run_simulation, SimulationConfig};
    use tempfile::TempDir;

    fn sample_result() -> SimulationResult {
        let config = SimulationConfig {
            generator: GeneratorParams {
                bars: 200,
                ..GeneratorParams::default()
            },
            ..SimulationConfig::default()
        };
        run_simulation(&config).unwrap()
    }

    fn line_count(path: &Path) -> usize {
        fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn write_candles_has_header_and_rows() {
        let result = sample_result();
        let mut buf = Vec::new();
        write_candles(&mut buf, &result.candles[..3]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,open,high,low,close,volume");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with(&result.candles[0].time.to_string()));
    }

    #[test]
    fn report_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report");
        let result = sample_result();

        CsvReportAdapter::new().write(&result, &out).unwrap();

        assert_eq!(line_count(&out.join("candles.csv")), 201);
        let overlay_points: usize = result.overlays.iter().map(|o| o.points.len()).sum();
        assert_eq!(line_count(&out.join("overlays.csv")), overlay_points + 1);
        assert_eq!(line_count(&out.join("rsi.csv")), result.rsi.len() + 1);
        assert_eq!(
            line_count(&out.join("markers.csv")).saturating_sub(1),
            result.backtest.markers.len()
        );
        assert_eq!(
            line_count(&out.join("trades.csv")).saturating_sub(1),
            result.backtest.trades.len()
        );
        assert_eq!(line_count(&out.join("summary.csv")), 8);
    }

    #[test]
    fn markers_use_lowercase_kind() {
        let dir = TempDir::new().unwrap();
        let result = sample_result();
        CsvReportAdapter::new().write(&result, dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("markers.csv")).unwrap();
        for line in content.lines().skip(1) {
            assert!(line.contains(",entry,") || line.contains(",exit,"), "{line}");
        }
    }

    #[test]
    fn summary_lists_metrics() {
        let dir = TempDir::new().unwrap();
        let result = sample_result();
        CsvReportAdapter::new().write(&result, dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        assert!(content.starts_with("metric,value\n"));
        assert!(content.contains("symbol,AAPL"));
        assert!(content.contains("bars,200"));
        assert!(content.contains("sharpe,"));
    }
}
