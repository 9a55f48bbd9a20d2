//! Truncated DCT-II generator binary.
//!
//! Prints the generated routine to stdout, or to `--output` when given.

use bumpalo::Bump;
use clap::Parser;
use std::fs;

use dctgen::check::{check_plan, probe_signal, verify_numerically};
use dctgen::{emit, planner, ConstantTable, EmitOptions, GenError, PlanningSession, Target};

/// Largest tolerated deviation from the reference transform under `--check`.
const CHECK_TOLERANCE: f64 = 1e-9;

#[derive(Parser)]
#[command(author, version, about = "Generate a truncated DCT-II routine")]
struct Cli {
    /// Transform order; the input size is 2^order
    #[arg(short = 'p', long, default_value_t = 5)]
    order: u32,
    /// Number of leading coefficients to compute
    #[arg(short = 'n', long, default_value_t = 11)]
    coefficients: u64,
    /// Output language
    #[arg(long, value_enum, default_value_t = Target::Javascript)]
    target: Target,
    /// Name of the generated function
    #[arg(long)]
    name: Option<String>,
    /// Declare every constant of the table, used or not
    #[arg(long)]
    all_constants: bool,
    /// Write the routine to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,
    /// Validate the plan structurally and numerically before emitting
    #[arg(long)]
    check: bool,
    /// Print planning statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let truncation = i64::try_from(cli.coefficients)
        .map(|n| n - 1)
        .map_err(|_| GenError::invalid("coefficients", i64::MAX, "too large"))?;

    let arena = Bump::new();
    let session = PlanningSession::new(&arena);
    let plan = planner::plan_truncated(&session, cli.order, truncation)?;
    let constants = ConstantTable::new(cli.order)?;

    if cli.check {
        let failures = check_plan(&plan);
        for failure in &failures {
            eprintln!("check: {}", failure);
        }
        if !failures.is_empty() {
            let message = format!("{} structural check(s) failed", failures.len());
            return Err(message.into());
        }

        let error = verify_numerically(&plan, &constants, &probe_signal(plan.buffer_len()))?;
        log::info!("numeric check: max relative error {:e}", error);
        if error > CHECK_TOLERANCE {
            let message = format!("numeric check failed: relative error {:e}", error);
            return Err(message.into());
        }
        eprintln!(
            "check: ok ({} ops, max relative error {:e})",
            plan.ops.len(),
            error
        );
    }

    let options = EmitOptions {
        function_name: cli.name.clone(),
        all_constants: cli.all_constants,
    };
    let source = emit::emit(&plan, &constants, cli.target, &options)?;

    match &cli.output {
        Some(path) => fs::write(path, source).map_err(GenError::from)?,
        None => print!("{}", source),
    }

    if cli.stats {
        eprint!("{}", session.stats());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
