//! SaaS Forecast CLI
//!
//! Command-line interface for running cash projections and managing saved
//! scenarios

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use saas_forecast::{
    codec, report, AssumptionSet, ScenarioLibrary, ScenarioRunner, YearMonth,
};

const DEFAULT_LIBRARY_PATH: &str = "scenarios.json";

#[derive(Debug, Parser)]
#[command(name = "saas-forecast", version, about = "Monthly cash projection for a SaaS business")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where the assumptions come from; defaults when neither is given
#[derive(Debug, clap::Args)]
struct Source {
    /// Encoded state (query string from a shared link)
    #[arg(long, conflicts_with = "scenario")]
    state: Option<String>,

    /// Name of a saved scenario
    #[arg(long)]
    scenario: Option<String>,

    /// Scenario library file
    #[arg(long, default_value = DEFAULT_LIBRARY_PATH)]
    library: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project the ledger and print it
    Project {
        #[command(flatten)]
        source: Source,

        /// First projected month (YYYY-MM); overrides the state
        #[arg(long)]
        start: Option<YearMonth>,

        /// Also write the full ledger to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Number of periods to print
        #[arg(long, default_value_t = 24)]
        rows: usize,
    },
    /// Print the encoded state
    Encode {
        #[command(flatten)]
        source: Source,
    },
    /// Save state to the scenario library
    Save {
        /// Scenario name (an existing scenario of this name is replaced)
        name: String,

        /// Encoded state to save; defaults when omitted
        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long, default_value = DEFAULT_LIBRARY_PATH)]
        library: PathBuf,
    },
    /// List saved scenarios
    List {
        #[arg(long, default_value = DEFAULT_LIBRARY_PATH)]
        library: PathBuf,
    },
}

fn load_assumptions(source: &Source) -> Result<AssumptionSet> {
    let defaults = AssumptionSet::default_plan();
    if let Some(state) = &source.state {
        return Ok(codec::decode_or_default(state, &defaults));
    }
    if let Some(name) = &source.scenario {
        let library = ScenarioLibrary::load_from(&source.library)
            .with_context(|| format!("reading {}", source.library.display()))?;
        return Ok(library.load(name, &defaults)?);
    }
    Ok(defaults)
}

fn run_project(
    source: &Source,
    start: Option<YearMonth>,
    csv: Option<&PathBuf>,
    rows: usize,
) -> Result<()> {
    let mut assumptions = load_assumptions(source)?;
    if start.is_some() {
        assumptions.forecast_start = start;
    }
    let start = assumptions.resolved_start();

    let result = ScenarioRunner::new().run(&assumptions);
    info!("projected {} months from {}", result.periods.len(), start);

    println!(
        "{:>4} {:>9} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "#", "Month", "MRR", "Inflows", "Outflows", "Net", "Cash"
    );
    println!("{}", "-".repeat(81));
    for p in result.periods.iter().take(rows) {
        println!(
            "{:>4} {:>9} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>14.0}",
            p.month,
            start.offset(p.month).label(),
            p.mrr,
            p.total_inflows,
            p.total_outflows,
            p.net_cashflow,
            p.cash_balance,
        );
    }
    if result.periods.len() > rows {
        println!("... ({} more months)", result.periods.len() - rows);
    }

    let summary = result.summary();
    println!();
    println!("Ending cash:     {:.0}", summary.ending_cash);
    println!(
        "Lowest cash:     {:.0}{}",
        summary.lowest_cash_balance,
        summary
            .lowest_cash_month
            .map(|m| format!(" ({})", start.offset(m).label()))
            .unwrap_or_default()
    );
    match summary.cash_out_month {
        Some(m) => println!("Cash runs out:   {}", start.offset(m).label()),
        None => println!("Cash runs out:   never within horizon"),
    }
    if summary.steady_state_mrr.is_finite() {
        println!("Steady-state MRR: {:.0}", summary.steady_state_mrr);
    } else {
        println!("Steady-state MRR: unbounded (no churn)");
    }

    if let Some(path) = csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        report::write_ledger(file, &result.periods, Some(start))?;
        println!("\nLedger written to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Project { source, start, csv, rows } => {
            run_project(source, *start, csv.as_ref(), *rows)?
        }
        Command::Encode { source } => {
            println!("{}", codec::encode(&load_assumptions(source)?));
        }
        Command::Save { name, state, note, library: path } => {
            let defaults = AssumptionSet::default_plan();
            let assumptions = match state {
                Some(state) => match codec::decode(state, &defaults) {
                    Ok(Some(decoded)) => decoded,
                    Ok(None) => bail!("state has no `ic` or `mrr` key"),
                    Err(e) => return Err(e).context("refusing to save unreadable state"),
                },
                None => defaults,
            };

            let mut library = ScenarioLibrary::load_from(path)?;
            library.save(name.clone(), note.clone(), &assumptions, Utc::now());
            library.save_to(path)?;
            println!("Saved `{}` to {} ({} scenarios)", name, path.display(), library.len());
        }
        Command::List { library: path } => {
            let library = ScenarioLibrary::load_from(path)?;
            if library.is_empty() {
                println!("No saved scenarios in {}", path.display());
            }
            for scenario in library.iter() {
                println!(
                    "{:<24} {}  {}",
                    scenario.name,
                    scenario.saved_at.format("%Y-%m-%d %H:%M"),
                    scenario.note.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}
