//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{ColumnLayout, CotCsvAdapter};
use crate::adapters::csv_signal_writer::CsvSignalWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::batch::{run_batch, BatchResult};
use crate::domain::calibration::{calibrate, parse_history};
use crate::domain::classifier::CurrencyResult;
use crate::domain::error::CotError;
use crate::domain::instrument::{InstrumentProfile, ThresholdTable};
use crate::domain::pair::PairResult;
use crate::domain::universe::{builtin_profile, parse_pairs, parse_symbols, Universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::signal_port::SignalPort;

pub const DEFAULT_SIGNALS_FILE: &str = "pair_signals.csv";

#[derive(Parser, Debug)]
#[command(
    name = "cotsignal",
    about = "Currency positioning pressure from CFTC COT futures data"
)]
pub struct Cli {
    /// Log every evaluated currency (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify currencies and rank pairs from a futures-only report
    Analyze {
        #[arg(short, long)]
        report: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pair signal CSV (default: pair_signals.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write every currency result to this CSV
        #[arg(long)]
        currencies: Option<PathBuf>,
    },
    /// Derive absolute thresholds from a history of weekly deltas
    Calibrate {
        #[arg(short, long)]
        deltas: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate and print the instrument universe
    Validate {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Installs the stderr subscriber. `RUST_LOG` applies unless `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            report,
            config,
            output,
            currencies,
        } => run_analyze(&report, config.as_ref(), output, currencies),
        Command::Calibrate { deltas, symbol } => run_calibrate(&deltas, symbol.as_deref()),
        Command::Validate { config } => run_validate(config.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CotError::ConfigParse {
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

/// Where the results of an analysis go.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub signals_path: PathBuf,
    pub currencies_path: Option<PathBuf>,
    /// Second directory that receives a copy of the signal file.
    pub mirror_dir: Option<PathBuf>,
}

pub fn build_output_settings(config: &dyn ConfigPort) -> OutputSettings {
    OutputSettings {
        signals_path: config
            .get_string("output", "signals_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SIGNALS_FILE)),
        currencies_path: config.get_string("output", "currencies_path").map(PathBuf::from),
        mirror_dir: config
            .get_string("output", "mirror_dir")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
    }
}

pub fn build_column_layout(config: &dyn ConfigPort) -> Result<ColumnLayout, CotError> {
    let defaults = ColumnLayout::default();
    let column = |key: &str, default: usize| -> Result<usize, CotError> {
        setting(config, "report", key, Some(default), parse_column)
    };
    Ok(ColumnLayout {
        name: column("name_column", defaults.name)?,
        date: column("date_column", defaults.date)?,
        long_positions: column("long_column", defaults.long_positions)?,
        short_positions: column("short_column", defaults.short_positions)?,
        long_change: column("long_change_column", defaults.long_change)?,
        short_change: column("short_change_column", defaults.short_change)?,
    })
}

fn parse_triple(value: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated numbers, got {}", parts.len()));
    }
    let mut triple = [0.0; 3];
    for (slot, part) in triple.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", part))?;
    }
    Ok(triple)
}

fn parse_int(value: &str) -> Result<i64, String> {
    value
        .trim()
        .replace('_', "")
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not an integer", value.trim()))
}

fn parse_column(value: &str) -> Result<usize, String> {
    let index = parse_int(value)?;
    usize::try_from(index)
        .map_err(|_| format!("column index must be non-negative, got {}", index))
}

/// Reads `[section] key` with `parse`, falling back to `fallback` when absent.
fn setting<T>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    fallback: Option<T>,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, CotError> {
    match config.get_string(section, key) {
        Some(raw) => parse(&raw).map_err(|reason| CotError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        }),
        None => fallback.ok_or_else(|| CotError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

const PROFILE_KEYS: [&str; 7] = [
    "label",
    "notional",
    "max_historical_delta",
    "absolute_positive",
    "absolute_negative",
    "percent_positive",
    "percent_negative",
];

/// Keys in the `[SYMBOL]` section that no profile setting reads, sorted.
pub fn unknown_profile_keys(config: &dyn ConfigPort, symbol: &str) -> Vec<String> {
    let mut unknown: Vec<String> = config
        .keys(symbol)
        .into_iter()
        .filter(|k| !PROFILE_KEYS.contains(&k.as_str()))
        .collect();
    unknown.sort();
    unknown
}

/// Builds one profile from its `[SYMBOL]` section layered over the built-in
/// defaults. Symbols without built-in defaults must set every key.
pub fn build_profile(config: &dyn ConfigPort, symbol: &str) -> Result<InstrumentProfile, CotError> {
    for key in unknown_profile_keys(config, symbol) {
        warn!(section = %symbol, key = %key, "unknown currency key ignored");
    }

    let base = builtin_profile(symbol);
    let abs = base.as_ref().map(|p| p.absolute_thresholds);
    let pct = base.as_ref().map(|p| p.percent_thresholds);

    let label = setting(
        config,
        symbol,
        "label",
        base.as_ref().map(|p| p.label.clone()),
        |s| Ok(s.trim().to_string()),
    )?;
    let notional_value = setting(
        config,
        symbol,
        "notional",
        base.as_ref().map(|p| p.notional_value),
        parse_int,
    )?;
    let max_historical_delta = setting(
        config,
        symbol,
        "max_historical_delta",
        base.as_ref().map(|p| p.max_historical_delta),
        parse_int,
    )?;

    let absolute_thresholds = ThresholdTable::new(
        setting(config, symbol, "absolute_positive", abs.map(|t| t.positive), parse_triple)?,
        setting(config, symbol, "absolute_negative", abs.map(|t| t.negative), parse_triple)?,
    );
    let percent_thresholds = ThresholdTable::new(
        setting(config, symbol, "percent_positive", pct.map(|t| t.positive), parse_triple)?,
        setting(config, symbol, "percent_negative", pct.map(|t| t.negative), parse_triple)?,
    );

    Ok(InstrumentProfile {
        symbol: symbol.to_string(),
        label,
        notional_value,
        max_historical_delta,
        absolute_thresholds,
        percent_thresholds,
    })
}

/// Built-in universe with the INI overrides applied, fully validated.
pub fn build_universe(config: &dyn ConfigPort) -> Result<Universe, CotError> {
    let mut universe = Universe::builtin();

    let symbols: Vec<String> = match config.get_string("universe", "currencies") {
        Some(list) => parse_symbols(&list).map_err(|e| CotError::ConfigInvalid {
            section: "universe".into(),
            key: "currencies".into(),
            reason: e.to_string(),
        })?,
        None => universe.profiles.iter().map(|p| p.symbol.clone()).collect(),
    };
    universe.profiles = symbols
        .iter()
        .map(|s| build_profile(config, s))
        .collect::<Result<_, _>>()?;

    if let Some(list) = config.get_string("universe", "pairs") {
        let pairs = parse_pairs(&list).map_err(|e| CotError::ConfigInvalid {
            section: "universe".into(),
            key: "pairs".into(),
            reason: e.to_string(),
        })?;
        if let Some(pair) = pairs.iter().find(|p| {
            universe.profile(&p.base).is_none() || universe.profile(&p.quote).is_none()
        }) {
            return Err(CotError::ConfigInvalid {
                section: "universe".into(),
                key: "pairs".into(),
                reason: format!("{} references a currency not in the universe", pair),
            });
        }
        universe.pairs = pairs;
    }

    for section in config.sections() {
        let known = matches!(section.as_str(), "default" | "universe" | "report" | "output")
            || universe
                .profiles
                .iter()
                .any(|p| p.symbol.eq_ignore_ascii_case(&section));
        if !known {
            warn!(section = %section, "config section matches no configured currency");
        }
    }

    universe.validate()?;
    Ok(universe)
}

fn run_analyze(
    report_path: &Path,
    config_path: Option<&PathBuf>,
    output_override: Option<PathBuf>,
    currencies_override: Option<PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Stage 2: Build and validate the universe
    let universe = match build_universe(&config) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let layout = match build_column_layout(&config) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Resolve outputs, command line first
    let mut output = build_output_settings(&config);
    if let Some(path) = output_override {
        output.signals_path = path;
    }
    if currencies_override.is_some() {
        output.currencies_path = currencies_override;
    }

    let data_port = CotCsvAdapter::with_layout(report_path.to_path_buf(), layout);
    eprintln!("Loading report from {}", report_path.display());
    run_analysis_pipeline(&data_port, &universe, &CsvSignalWriter, &output)
}

pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    universe: &Universe,
    signal_port: &dyn SignalPort,
    output: &OutputSettings,
) -> ExitCode {
    // Stage 4: Load report
    let report = match data_port.load_report() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    match report.as_of {
        Some(date) => eprintln!("  {} rows, report date {}", report.rows.len(), date),
        None => eprintln!("  {} rows", report.rows.len()),
    }

    // Stage 5: Classify and score
    let result = match run_batch(&report, universe) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 6: Console summary
    print_results(&result);

    if !result.omitted_currencies.is_empty() {
        eprintln!(
            "\nwarning: {} of {} currencies omitted",
            result.omission_count(),
            universe.count()
        );
        for omission in &result.omitted_currencies {
            eprintln!("  {}: {}", omission.symbol, omission.reason);
        }
    }

    if result.currencies.is_empty() {
        eprintln!("error: no configured currency found in the report");
        return ExitCode::from(5);
    }

    // Stage 7: Persist
    if let Err(e) = signal_port.write_signals(&result, &output.signals_path) {
        eprintln!("error: failed to write signals: {e}");
        return (&e).into();
    }
    eprintln!("\nSignals written to: {}", output.signals_path.display());

    if let Some(dir) = &output.mirror_dir {
        let mirror = dir.join(DEFAULT_SIGNALS_FILE);
        match signal_port.write_signals(&result, &mirror) {
            Ok(()) => eprintln!("Signals mirrored to: {}", mirror.display()),
            Err(e) => eprintln!("warning: failed to mirror signals: {e}"),
        }
    }

    if let Some(path) = &output.currencies_path {
        if let Err(e) = signal_port.write_currencies(&result, path) {
            eprintln!("error: failed to write currency results: {e}");
            return (&e).into();
        }
        eprintln!("Currency results written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

pub fn format_currency(result: &CurrencyResult) -> String {
    let obs = &result.observation;
    let d = &result.delta;
    format!(
        "{} ({})\n  \
         Long / short:       {} / {}\n  \
         Change long/short:  {:+} / {:+}  [{}]\n  \
         Delta:              {:+}\n  \
         Weighted delta:     {}\n  \
         Normalized delta:   {:.2}\n  \
         Historical tier:    {}\n  \
         Modern tier:        {} ({:.1}%)\n  \
         Final tier:         {}",
        result.symbol,
        obs.name,
        obs.long_positions,
        obs.short_positions,
        obs.long_change,
        obs.short_change,
        result.shift(),
        d.simple_delta,
        d.raw_delta,
        d.normalized_delta,
        result.historical_tier,
        result.modern_tier,
        d.delta_percent,
        result.final_tier,
    )
}

pub fn format_pair(pair: &PairResult) -> String {
    format!(
        "{:<8} {:>3}  {:<18} {} {} / {} {}",
        pair.name(),
        pair.score,
        pair.strength_label.as_str(),
        pair.base_symbol,
        pair.base_tier,
        pair.quote_symbol,
        pair.quote_tier,
    )
}

fn print_results(result: &BatchResult) {
    println!("=== Currencies ===");
    for currency in &result.currencies {
        println!("{}", format_currency(currency));
    }

    println!("\n=== Pairs (by score) ===");
    for pair in &result.pairs {
        println!("{}", format_pair(pair));
    }
}

fn run_calibrate(deltas_path: &Path, symbol: Option<&str>) -> ExitCode {
    eprintln!("Reading delta history from {}", deltas_path.display());
    let content = match fs::read_to_string(deltas_path) {
        Ok(c) => c,
        Err(e) => {
            let err = CotError::from(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let history = parse_history(&content);
    let calibration = match calibrate(&history) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "  {} values ({} positive, {} negative), min {}, max {}",
        history.len(),
        calibration.positive_samples,
        calibration.negative_samples,
        calibration.min,
        calibration.max
    );

    let t = calibration.thresholds;
    if let Some(sym) = symbol {
        println!("[{}]", sym.to_uppercase());
    }
    println!(
        "absolute_positive = {}, {:.2}, {:.2}",
        t.positive[0], t.positive[1], t.positive[2]
    );
    println!(
        "absolute_negative = {}, {:.2}, {:.2}",
        t.negative[0], t.negative[1], t.negative[2]
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let universe = match build_universe(&config) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = build_column_layout(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    for p in &universe.profiles {
        println!("{}  {}", p.symbol, p.label);
        println!(
            "  notional {}, max historical delta {}",
            p.notional_value, p.max_historical_delta
        );
        println!(
            "  absolute {:?} / {:?}",
            p.absolute_thresholds.positive, p.absolute_thresholds.negative
        );
        println!(
            "  percent  {:?} / {:?}",
            p.percent_thresholds.positive, p.percent_thresholds.negative
        );
    }
    let pairs: Vec<String> = universe.pairs.iter().map(|p| p.name()).collect();
    println!("pairs: {}", pairs.join(", "));

    eprintln!(
        "\nUniverse is valid: {} currencies, {} pairs",
        universe.count(),
        universe.pairs.len()
    );
    ExitCode::SUCCESS
}
