//! Command-line front end for the supplier allocation engine.
//!
//! Commands:
//! - `supply-allocation compare` - Run all six strategies against one scenario
//! - `supply-allocation sweep` - Run a disruption (and optional demand) sweep to CSV

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use supply_allocation::io::{reporting, scenarios, suppliers};
use supply_allocation::logging;
use supply_allocation::model::{
    default_suppliers, Scenario, SupplierRegistry, DEFAULT_PLANNING_HORIZON_WEEKS,
};
use supply_allocation::simulation::{EngineConfig, StrategyComparator};
use supply_allocation::solver::{backend_by_name, BACKEND_NAMES};

#[derive(Parser)]
#[command(name = "supply-allocation")]
#[command(about = "Compare supplier allocation strategies under disruption")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Supplier CSV (the built-in titanium panel when omitted)
    #[arg(short, long)]
    suppliers: Option<PathBuf>,

    /// JSON engine config (tolerance, balanced weights)
    #[arg(long)]
    config: Option<PathBuf>,

    /// LP backend: simplex or greedy
    #[arg(long, default_value = "simplex")]
    solver: String,

    /// Planning horizon in weeks
    #[arg(long, default_value_t = DEFAULT_PLANNING_HORIZON_WEEKS)]
    horizon: u32,

    /// Include suppliers without aerospace qualification
    #[arg(long)]
    allow_unqualified: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every strategy against one scenario
    Compare {
        #[command(flatten)]
        engine: EngineArgs,

        /// Order quantity in kg
        #[arg(short = 'q', long, default_value_t = 5000.0)]
        order_kg: f64,

        /// Supplier taken offline
        #[arg(long)]
        disrupt: Option<String>,

        /// Weeks the disrupted supplier stays offline
        #[arg(long, default_value_t = 12)]
        weeks: u32,

        /// Print the comparison as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Write result rows to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the week-by-week delivery curves to this CSV
        #[arg(long)]
        timeline: Option<PathBuf>,
    },

    /// Take each supplier offline in turn (optionally over sampled order sizes)
    Sweep {
        #[command(flatten)]
        engine: EngineArgs,

        /// Order quantity in kg (mean when sampling)
        #[arg(short = 'q', long, default_value_t = 5000.0)]
        order_kg: f64,

        /// Weeks each disrupted supplier stays offline
        #[arg(long, default_value_t = 12)]
        weeks: u32,

        /// Additional order sizes drawn from a Normal distribution
        #[arg(long, default_value_t = 0)]
        demand_samples: usize,

        /// Standard deviation of sampled order sizes
        #[arg(long, default_value_t = 1000.0)]
        std_dev: f64,

        /// Seed for sampled order sizes
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output CSV
        #[arg(short, long, default_value = "sweep_results.csv")]
        output: PathBuf,
    },
}

fn build_comparator(args: &EngineArgs) -> Result<StrategyComparator> {
    let supplier_list = match &args.suppliers {
        Some(path) => suppliers::load_suppliers(path)
            .with_context(|| format!("loading suppliers from {}", path.display()))?,
        None => default_suppliers(),
    };
    let registry = SupplierRegistry::new(supplier_list)?;

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let backend = backend_by_name(&args.solver).with_context(|| {
        format!(
            "unknown solver '{}', expected one of {:?}",
            args.solver, BACKEND_NAMES
        )
    })?;

    Ok(StrategyComparator::new(registry, config, backend))
}

fn base_scenario(args: &EngineArgs, order_kg: f64) -> Scenario {
    let mut scenario = Scenario::new(order_kg).with_horizon(args.horizon);
    if args.allow_unqualified {
        scenario = scenario.allow_unqualified();
    }
    scenario
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Compare {
            engine,
            order_kg,
            disrupt,
            weeks,
            json,
            output,
            timeline,
        } => {
            let comparator = build_comparator(&engine)?;
            let mut scenario = base_scenario(&engine, order_kg);
            if let Some(name) = disrupt {
                scenario = scenario.with_disruption(name, weeks);
            }

            let comparison = comparator.compare(&scenario)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                println!("{}", reporting::format_comparison_table(&comparison));
                if let Some(best) = comparison.best_feasible() {
                    println!("{}", reporting::format_result_summary(&comparison, best));
                }
            }

            let batch = [comparison];
            if let Some(path) = output {
                reporting::write_comparison_csv(&path, &batch)?;
            }
            if let Some(path) = timeline {
                reporting::write_timeline_csv(&path, &batch)?;
            }
        }

        Commands::Sweep {
            engine,
            order_kg,
            weeks,
            demand_samples,
            std_dev,
            seed,
            output,
        } => {
            let comparator = build_comparator(&engine)?;
            let base = base_scenario(&engine, order_kg);

            // 1. Every supplier offline at the base order size
            let mut batch = scenarios::disruption_sweep(comparator.registry(), &base, weeks);

            // 2. Optionally repeat the sweep over sampled order sizes
            let samples =
                scenarios::normal_demand_sweep(&base, demand_samples, order_kg, std_dev, seed)?;
            for sampled in &samples {
                let sweep = scenarios::disruption_sweep(comparator.registry(), sampled, weeks);
                batch.extend(sweep);
            }

            let mut comparisons = Vec::with_capacity(batch.len());
            let mut failed = 0;
            for outcome in comparator.compare_batch(&batch) {
                match outcome {
                    Ok(comparison) => comparisons.push(comparison),
                    Err(e) => {
                        eprintln!("skipped scenario: {e}");
                        failed += 1;
                    }
                }
            }

            let rows = reporting::write_comparison_csv(&output, &comparisons)?;
            println!(
                "{} scenarios evaluated with the {} solver ({} skipped), {} rows written to {}",
                comparisons.len(),
                comparator.backend_name(),
                failed,
                rows,
                output.display()
            );
        }
    }

    Ok(())
}
