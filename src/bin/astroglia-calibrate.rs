//! astroglia-calibrate - derive astrocyte hardware knobs from physiological targets
//!
//! # Usage
//!
//! ```bash
//! # Knobs for a 40 Hz SIC burst lasting 300 ms
//! astroglia-calibrate data/sic_calibration.csv --amplitude 40 --window 300
//!
//! # Start from a JSON config, override one target, print JSON
//! astroglia-calibrate data/sic_calibration.csv --config astro.json --sensitivity 25 --json
//! ```
//!
//! # Exit Codes
//!
//! - 0: Knobs derived
//! - 1: A target is outside its valid range
//! - 2: Invalid arguments, unreadable table or config

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use astroglia::{
    AstroError, AstrocyteConfig, CalibrationTable, CompartmentPipeline, DerivedKnobs,
    ParameterStore, RecordingSubstrate, Stage, Targets,
};

struct Args {
    table: String,
    config: Option<String>,
    targets: Targets,
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("Error: {}\n", msg);
            print_help();
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<AstroError>() {
                Some(AstroError::Validation { .. }) => ExitCode::FAILURE,
                _ => ExitCode::from(2),
            }
        }
    }
}

fn parse_args(argv: Vec<String>) -> Result<Option<Args>, String> {
    let mut table = None;
    let mut config = None;
    let mut targets = Targets::default();
    let mut json = false;

    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--json" => json = true,
            "--config" | "-c" => config = Some(value(&mut iter, &arg)?),
            "--amplitude" | "-a" => targets.sic_amplitude = Some(number(&mut iter, &arg)?),
            "--window" | "-w" => targets.sic_window = Some(number(&mut iter, &arg)?),
            "--sensitivity" | "-s" => {
                let raw = value(&mut iter, &arg)?;
                let ms = raw
                    .parse::<i64>()
                    .map_err(|_| format!("{} expects an integer, got '{}'", arg, raw))?;
                targets.ip3_sensitivity = Some(ms);
            }
            _ if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            _ if table.is_none() => table = Some(arg),
            _ => return Err(format!("Unexpected argument: {}", arg)),
        }
    }

    let table = table.ok_or_else(|| "No calibration table specified".to_string())?;
    Ok(Some(Args {
        table,
        config,
        targets,
        json,
    }))
}

fn value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next().ok_or_else(|| format!("{} expects a value", flag))
}

fn number(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<f64, String> {
    let raw = value(iter, flag)?;
    raw.parse::<f64>()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, raw))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let table = CalibrationTable::load(&args.table)
        .with_context(|| format!("Loading calibration table {}", args.table))?;

    let mut config = match &args.config {
        Some(path) => AstrocyteConfig::from_json_file(path)
            .with_context(|| format!("Reading config {}", path))?,
        None => AstrocyteConfig::default(),
    };
    config.merge_targets(args.targets);

    let store = ParameterStore::new(Arc::new(table), config.into_mode())
        .context("Deriving astrocyte knobs")?;
    let derived = store.snapshot();

    if args.json {
        let report = json_report(&derived)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&derived);
    }
    Ok(())
}

fn json_report(derived: &DerivedKnobs) -> anyhow::Result<serde_json::Value> {
    // dry run: record the requests realization would make
    let mut net = RecordingSubstrate::new();
    CompartmentPipeline::from_knobs(&derived.knobs).realize(&mut net)?;

    Ok(serde_json::json!({
        "knobs": derived.knobs,
        "targets": derived.targets,
        "calibration": derived.calibration.map(|hit| serde_json::json!({
            "row": hit.index,
            "weight": hit.weight_hw(),
            "decay": hit.decay_hw(),
            "cost": hit.cost,
        })),
        "substrate": net,
    }))
}

fn print_report(derived: &DerivedKnobs) {
    let knobs = &derived.knobs;
    let targets = &derived.targets;

    println!("Targets");
    println!("  ip3_sensitivity: {}", show(targets.ip3_sensitivity));
    println!("  sic_amplitude:   {}", show(targets.sic_amplitude));
    println!("  sic_window:      {}", show(targets.sic_window));

    if let Some(hit) = derived.calibration {
        println!(
            "Calibration row {} (weight {}, decay {:.4}, cost {:.3})",
            hit.index, hit.weight, hit.decay_raw, hit.cost
        );
    }

    println!("Knobs");
    println!("  sr -> ip3 weight:       {}", knobs.sr_to_ip3_weight);
    println!("  ip3 -> sic weight:      {}", knobs.ip3_to_sic_weight);

    let pipeline = CompartmentPipeline::from_knobs(knobs);
    println!("Stages (threshold / current decay / voltage decay)");
    for stage in Stage::ALL {
        let spec = pipeline.stage(stage);
        println!(
            "  {:<16} {:>6} / {:>5} / {:>5}",
            stage.name(),
            show(spec.v_th_mant),
            spec.current_decay,
            spec.voltage_decay
        );
    }
}

fn show<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_help() {
    eprintln!(
        r#"astroglia-calibrate - derive astrocyte hardware knobs

USAGE:
    astroglia-calibrate <TABLE> [OPTIONS]

ARGS:
    <TABLE>    Calibration table (weight, decay_raw, firing_rate_hz, window_ms)

OPTIONS:
    -c, --config <FILE>       JSON astrocyte config
    -a, --amplitude <HZ>      SIC amplitude target (0-356)
    -w, --window <MS>         SIC window target (0-608)
    -s, --sensitivity <MS>    IP3 sensitivity target (1-100)
        --json                Print derived knobs and the realized pipeline as JSON
    -h, --help                Print help

ENVIRONMENT:
    RUST_LOG=debug            Show calibration hits"#
    );
}
