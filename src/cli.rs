//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::{write_candles, CsvReportAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{parse_value, validate_simulation_config};
use crate::domain::error::SimtraderError;
use crate::domain::generator::{generate, parse_start_time, session_bars, GeneratorParams};
use crate::domain::simulation::{run_simulation, SimulationConfig, SimulationResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "simtrader", about = "Synthetic intraday series and SMA crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override config file values.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub bars: Option<usize>,
    #[arg(long)]
    pub fast: Option<usize>,
    #[arg(long)]
    pub slow: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a series, compute indicators and run the crossover backtest
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        /// Directory for the CSV report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate candles only and write them as CSV
    Generate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            overrides,
            output,
        } => run_simulate(config.as_ref(), &overrides, output.as_ref()),
        Command::Generate {
            config,
            overrides,
            output,
        } => run_generate(config.as_ref(), &overrides, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SimtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Build a `SimulationConfig` from `[simulation]`, `[strategy]` and
/// `[indicators]`, falling back to defaults for missing keys.
///
/// `bars` wins over `minutes`; with only `minutes`, the bar count is the
/// session length divided by the interval, clamped to the display range.
pub fn build_simulation_config(
    adapter: &dyn ConfigPort,
) -> Result<SimulationConfig, SimtraderError> {
    let defaults = SimulationConfig::default();
    let gen_defaults = GeneratorParams::default();

    let interval_minutes: u32 = parse_value(adapter, "simulation", "interval_minutes")?
        .unwrap_or(gen_defaults.interval_minutes);

    let bars = match parse_value::<usize>(adapter, "simulation", "bars")? {
        Some(bars) => bars,
        None => match parse_value::<u32>(adapter, "simulation", "minutes")? {
            Some(minutes) => session_bars(minutes, interval_minutes)?,
            None => gen_defaults.bars,
        },
    };

    let start_time = match adapter.get_string("simulation", "start_time") {
        Some(s) if !s.trim().is_empty() => parse_start_time(&s)?,
        _ => gen_defaults.start_time,
    };

    let symbol = adapter
        .get_string("simulation", "symbol")
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or(defaults.symbol);

    Ok(SimulationConfig {
        symbol,
        generator: GeneratorParams {
            bars,
            interval_minutes,
            start_price: parse_value(adapter, "simulation", "start_price")?
                .unwrap_or(gen_defaults.start_price),
            drift: parse_value(adapter, "simulation", "drift")?.unwrap_or(gen_defaults.drift),
            volatility: parse_value(adapter, "simulation", "volatility")?
                .unwrap_or(gen_defaults.volatility),
            seed: parse_value(adapter, "simulation", "seed")?.unwrap_or(gen_defaults.seed),
            start_time,
        },
        fast: parse_value(adapter, "strategy", "fast")?.unwrap_or(defaults.fast),
        slow: parse_value(adapter, "strategy", "slow")?.unwrap_or(defaults.slow),
        rsi_period: parse_value(adapter, "indicators", "rsi_period")?
            .unwrap_or(defaults.rsi_period),
    })
}

pub fn apply_overrides(config: &mut SimulationConfig, overrides: &Overrides) {
    if let Some(seed) = overrides.seed {
        config.generator.seed = seed;
    }
    if let Some(bars) = overrides.bars {
        config.generator.bars = bars;
    }
    if let Some(fast) = overrides.fast {
        config.fast = fast;
    }
    if let Some(slow) = overrides.slow {
        config.slow = slow;
    }
}

fn resolve_config(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
) -> Result<(FileConfigAdapter, SimulationConfig), ExitCode> {
    let adapter = load_optional_config(config_path)?;

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }

    let mut config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };
    apply_overrides(&mut config, overrides);
    Ok((adapter, config))
}

pub fn print_summary(result: &SimulationResult) {
    let m = &result.backtest.metrics;
    eprintln!("\n=== {} ===", result.symbol);
    eprintln!("Bars:             {}", result.candles.len());
    eprintln!("Trades:           {}", m.trade_count);
    eprintln!("Return:           {:.2}%", m.total_return_pct);
    eprintln!("Max Drawdown:     {:.2}%", m.max_drawdown_pct);
    eprintln!("Win Rate:         {:.1}%", m.win_rate_pct);
    eprintln!("Sharpe (approx):  {:.2}", m.sharpe);
}

fn run_simulate(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, config) = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!(
        "Simulating {}: {} bars, seed {}, SMA({}) / SMA({})",
        config.symbol, config.generator.bars, config.generator.seed, config.fast, config.slow
    );

    let result = match run_simulation(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result);

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output_dir").map(PathBuf::from));

    if let Some(dir) = output {
        if let Err(e) = CsvReportAdapter::new().write(&result, &dir) {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", dir.display());
    }

    ExitCode::SUCCESS
}

fn run_generate(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let (_, config) = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let candles = match generate(&config.generator) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let written = match output_path {
        Some(path) => fs::File::create(path)
            .map_err(SimtraderError::from)
            .and_then(|file| write_candles(file, &candles)),
        None => write_candles(io::stdout().lock(), &candles),
    };

    match written {
        Ok(()) => {
            if let Some(path) = output_path {
                eprintln!("{} candles written to {}", candles.len(), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nSimulation:");
    eprintln!("  symbol:     {}", config.symbol);
    eprintln!("  bars:       {}", config.generator.bars);
    eprintln!("  interval:   {}m", config.generator.interval_minutes);
    eprintln!("  seed:       {}", config.generator.seed);
    eprintln!("\nStrategy:");
    eprintln!("  fast:       SMA({})", config.fast);
    eprintln!("  slow:       SMA({})", config.slow);
    if config.fast >= config.slow {
        eprintln!("  warning: fast >= slow, the crossover can never signal");
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
