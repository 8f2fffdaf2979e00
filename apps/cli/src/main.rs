#![deny(warnings)]

//! Headless front end for the profitability calculators.
//!
//! Each run restores the domain's saved inputs, applies `--inputs` and
//! `--set` edits, computes, prints a report and saves the edited inputs.

mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use persistence::{FileStore, KvStore};
use roi_core::{
    set_field, AgencyInput, Domain, EcommerceInput, InputRecord, LeadGenInput, ScenarioInput,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");

/// Marketing profitability calculators: e-commerce, lead generation and agency audit.
#[derive(Parser)]
#[command(name = "roi", author, version = VERSION, about, long_about = None)]
struct Cli {
    /// Directory holding saved inputs.
    #[arg(
        long,
        global = true,
        env = "ROI_STORE_DIR",
        default_value = persistence::default_store_dir()
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unit economics, break-even ROAS and max CPA/CPC for a store.
    Ecommerce {
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Cost-per-lead economics and net marketing ROI.
    Leadgen(RunArgs),
    /// What an agency really costs, with red flags.
    Agency(RunArgs),
    /// Print the help entry for a metric key (e.g. `breakEvenROAS`).
    Explain { key: String },
    /// Forget saved inputs so the next run starts from defaults.
    Reset {
        #[arg(value_enum)]
        domain: ResetTarget,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// YAML input record; replaces the saved inputs (missing keys take defaults).
    #[arg(long, value_name = "FILE")]
    inputs: Option<PathBuf>,

    /// Edit one field, e.g. `--set aov=150` or `--set agencyFeeType=flat`. Repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Do not persist the edited inputs.
    #[arg(long)]
    no_save: bool,

    /// Print the raw output record as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct ScenarioArgs {
    /// What-if: conversion rate increase, in percent.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    increase_cvr: f64,
    /// What-if: AOV increase, in percent.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    increase_aov: f64,
    /// What-if: COGS reduction, in percent of current COGS.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    reduce_cogs: f64,
}

impl From<&ScenarioArgs> for ScenarioInput {
    fn from(args: &ScenarioArgs) -> Self {
        ScenarioInput {
            increase_cvr: args.increase_cvr,
            increase_aov: args.increase_aov,
            reduce_cogs: args.reduce_cogs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ResetTarget {
    Ecommerce,
    Leadgen,
    Agency,
    All,
}

impl ResetTarget {
    fn domains(self) -> &'static [Domain] {
        match self {
            ResetTarget::Ecommerce => &[Domain::Ecommerce],
            ResetTarget::Leadgen => &[Domain::LeadGen],
            ResetTarget::Agency => &[Domain::Agency],
            ResetTarget::All => &Domain::ALL,
        }
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got {raw:?}")),
    }
}

fn read_inputs<T: InputRecord>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading inputs from {}", path.display()))?;
    let record = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing inputs from {}", path.display()))?;
    Ok(record)
}

/// Saved (or file-supplied) inputs with the `--set` edits applied in order.
fn prepare<T: InputRecord>(store: &dyn KvStore, args: &RunArgs) -> Result<T> {
    let mut record: T = match &args.inputs {
        Some(path) => read_inputs(path)?,
        None => persistence::load_or_default(store),
    };
    for (field, value) in &args.set {
        set_field(&mut record, field, value)
            .with_context(|| format!("applying --set {field}={value}"))?;
    }
    Ok(record)
}

fn persist<T: InputRecord>(store: &mut dyn KvStore, args: &RunArgs, record: &T) -> Result<()> {
    if args.no_save {
        return Ok(());
    }
    persistence::save(store, record).with_context(|| format!("saving {}", T::STORAGE_KEY))?;
    info!(key = T::STORAGE_KEY, "inputs saved");
    Ok(())
}

/// Pretty JSON; non-finite metrics come out as `"Infinity"` / `"NaN"`.
fn to_json<O: Serialize>(output: &O) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

fn emit<O, F>(args: &RunArgs, output: &O, render: F) -> Result<()>
where
    O: Serialize,
    F: FnOnce(&O) -> report::Report,
{
    if args.json {
        println!("{}", to_json(output)?);
    } else {
        print!("{}", render(output));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut store = FileStore::new(&cli.store);
    match cli.command {
        Commands::Ecommerce { run, scenario } => {
            let input: EcommerceInput = prepare(&store, &run)?;
            let scenario = ScenarioInput::from(&scenario);
            let output = roi_engine::ecommerce::compute(&input, &scenario);
            emit(&run, &output, |o| report::ecommerce(o, &scenario))?;
            persist(&mut store, &run, &input)
        }
        Commands::Leadgen(run) => {
            let input: LeadGenInput = prepare(&store, &run)?;
            let output = roi_engine::leadgen::compute(&input);
            emit(&run, &output, report::leadgen)?;
            persist(&mut store, &run, &input)
        }
        Commands::Agency(run) => {
            let input: AgencyInput = prepare(&store, &run)?;
            let output = roi_engine::agency::compute(&input);
            emit(&run, &output, report::agency)?;
            persist(&mut store, &run, &input)
        }
        Commands::Explain { key } => {
            let entry = help_content::explain(&key)?;
            println!("{}\n\n{}\n\nExample: {}", entry.title, entry.explanation, entry.example);
            Ok(())
        }
        Commands::Reset { domain } => reset(&mut store, domain),
    }
}

fn reset(store: &mut dyn KvStore, target: ResetTarget) -> Result<()> {
    for &domain in target.domains() {
        persistence::reset(&mut *store, domain)?;
    }
    info!(?target, "saved inputs cleared");
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup; stdout is reserved for reports
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(version = VERSION, store = %cli.store.display(), "starting");
    run(cli)
}
