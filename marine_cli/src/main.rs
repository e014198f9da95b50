//! # Marine Calculator CLI
//!
//! Sizes a vessel's DC electrical system from a JSON input file and/or
//! individual field assignments.
//!
//! Usage:
//!   marine_cli --input boat.json
//!   marine_cli --set vessel_length=7.6 --set cabin_lights=60 --set solar=100
//!   marine_cli --input boat.json --policy strict.toml --json

mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use marine_core::{calculate_marine_with, EnginePolicy, MarineForm, MarineInputs};
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "marine_cli",
    version,
    about = "Size the battery bank, charging, cabling and inverter of a small vessel"
)]
struct Args {
    /// JSON file with calculator inputs; missing fields take their defaults
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Set a single field, e.g. --set solar=200 (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// TOML file overriding engine constants
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Print results as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "marine_core=debug,marine_cli=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_inputs(path: &Path) -> Result<MarineInputs> {
    let text = fs::read_to_string(path).with_context(|| format!("reading inputs from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing inputs in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let policy = match &args.policy {
        Some(path) => {
            EnginePolicy::from_toml_file(path).with_context(|| format!("loading policy {}", path.display()))?
        }
        None => EnginePolicy::default(),
    };

    let base = match &args.input {
        Some(path) => load_inputs(path)?,
        None => MarineInputs::default(),
    };

    let mut form = MarineForm::from(&base);
    for assignment in &args.set {
        let field = form
            .apply_assignment(assignment)
            .with_context(|| format!("applying --set {}", assignment))?;
        debug!(field = field.key(), value = form.get(field), "field set");
    }

    if !form.can_calculate() {
        bail!("vessel length must be greater than zero (use --set vessel_length=<metres>)");
    }

    let inputs = form.commit();
    if let Err(err) = inputs.validate() {
        warn!(code = err.error_code(), "{}; the engine will substitute its default", err);
    }

    let results = calculate_marine_with(&inputs, &policy);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", report::render_report(&inputs, &results, &policy));
    }

    Ok(())
}
