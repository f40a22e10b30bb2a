#![warn(missing_docs)]
//! modbench CLI Library
//!
//! Command-line front end for binaries that register benchmark modules.
//! Call `modbench::run()` (or `modbench_cli::run()`) from `main` to get the
//! full harness over every module linked into the binary.
//!
//! # Example
//!
//! ```ignore
//! use modbench::prelude::*;
//!
//! register_module!(Fibonacci, "fibonacci");
//!
//! fn main() -> anyhow::Result<()> {
//!     modbench::run()
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, ModuleStatistics, build_report, compute_statistics,
    format_human_output,
};
pub use planner::{ExecutionPlan, build_plan};

use anyhow::Context;
use clap::{Parser, Subcommand};
use modbench_core::{
    FixturePolicy, Override, Overrides, RunConfig, discover, registered_modules, resolve_sources,
};
use modbench_report::{OutputFormat, Report, generate_csv_report, generate_json_report};
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// modbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "modbench")]
#[command(author, version, about = "modbench - sequential micro-benchmark harness")]
pub struct Cli {
    /// Optional subcommand; defaults to running the suite
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Module names to run (all registered modules if none), mixed with
    /// NAME=VALUE or MODULE.NAME=VALUE parameter overrides
    #[arg(value_name = "MODULE|NAME=VALUE")]
    pub args: Vec<String>,

    /// Global iteration multiplier
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub multiplier: Option<u32>,

    /// Parameter override (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Only run modules whose name matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Fixture policy: shared (build once) or fresh (rebuild per iteration)
    #[arg(long)]
    pub fixture: Option<FixturePolicy>,

    /// Report the first K iterations as a separate warmup phase
    #[arg(long, value_name = "K")]
    pub warmup_iterations: Option<u64>,

    /// Per-module wall-clock budget (e.g. "500ms", "30s", "2m")
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pin the harness thread to this CPU core (Linux only)
    #[arg(long, value_name = "CORE")]
    pub pin_cpu: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all registered modules
    List,
    /// Print a default modbench.toml
    InitConfig,
}

/// Run the modbench CLI with the process arguments.
/// This is the main entry point for benchmark binaries.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the modbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::List) => list_modules(&cli),
        Some(Commands::InitConfig) => {
            print!("{}", ModbenchConfig::default_toml());
            Ok(())
        }
        None => {
            let config = ModbenchConfig::discover().unwrap_or_default();
            run_modules(&cli, &config)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "modbench=debug" } else { "modbench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded in another program
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Split positional arguments into module names and overrides
fn split_args(args: &[String]) -> anyhow::Result<(Vec<String>, Overrides)> {
    let mut names = Vec::new();
    let mut overrides = Overrides::new();
    for arg in args {
        if arg.contains('=') {
            overrides.push(arg.parse::<Override>()?);
        } else {
            names.push(arg.clone());
        }
    }
    Ok((names, overrides))
}

fn compile_filter(filter: Option<&str>) -> anyhow::Result<Option<Regex>> {
    filter
        .map(|f| Regex::new(f).with_context(|| format!("invalid --filter pattern `{}`", f)))
        .transpose()
}

fn plan_for(cli: &Cli, names: &[String]) -> anyhow::Result<ExecutionPlan> {
    let filter = compile_filter(cli.filter.as_deref())?;
    Ok(build_plan(
        names,
        registered_modules().into_iter().map(|def| def.name),
        filter.as_ref(),
    ))
}

fn list_modules(cli: &Cli) -> anyhow::Result<()> {
    let (names, _) = split_args(&cli.args)?;
    let plan = plan_for(cli, &names)?;

    println!("modbench Plan:");
    for name in &plan.modules {
        match modbench_core::find_module(name) {
            Some(def) => println!("├── {} ({}:{})", def.name, def.file, def.line),
            None => println!("├── {} (not registered)", name),
        }
    }
    println!("{} modules found.", plan.modules.len());

    Ok(())
}

/// Build an ExecutionConfig by layering: modbench.toml defaults → CLI overrides.
fn build_execution_config(cli: &Cli, config: &ModbenchConfig) -> anyhow::Result<ExecutionConfig> {
    let (_, positional) = split_args(&cli.args)?;

    // File params first so command-line overrides win
    let mut overrides = config.overrides();
    overrides.extend(positional.iter().cloned());
    for param in &cli.params {
        overrides.push(param.parse::<Override>()?);
    }

    let timeout = match &cli.timeout {
        Some(s) => Some(Duration::from_nanos(ModbenchConfig::parse_duration(s)?)),
        None => config.timeout()?,
    };

    let multiplier = cli.multiplier.unwrap_or(config.runner.multiplier);
    if multiplier == 0 {
        anyhow::bail!("multiplier must be at least 1");
    }

    Ok(ExecutionConfig {
        run: RunConfig {
            multiplier,
            fixture: cli.fixture.unwrap_or(config.runner.fixture),
            warmup_iterations: cli
                .warmup_iterations
                .unwrap_or(config.runner.warmup_iterations),
            timeout,
            overrides,
        },
        pin_cpu: cli.pin_cpu.or(config.runner.pin_cpu),
        show_progress: true,
    })
}

/// Load, run and report the named modules.
///
/// An empty list runs every registered module. Unknown names are reported
/// as load failures.
pub fn run_suite(names: &[String], config: ExecutionConfig) -> Report {
    let start_time = Instant::now();

    let discovery = discover(resolve_sources(names));
    tracing::info!(
        modules = discovery.suite.len(),
        rejected = discovery.errors.len(),
        "running suite"
    );

    let executor = Executor::new(config);
    let outcomes = executor.execute(discovery.suite);
    let stats = compute_statistics(&outcomes, executor.run_config().warmup_iterations);

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    build_report(
        &outcomes,
        stats,
        &discovery.errors,
        executor.run_config(),
        total_duration_ms,
    )
}

/// Render a report in the requested format
pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report)?,
        OutputFormat::Human => format_human_output(report),
    })
}

fn run_modules(cli: &Cli, config: &ModbenchConfig) -> anyhow::Result<()> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let (names, _) = split_args(&cli.args)?;
    let plan = plan_for(cli, &names)?;
    if plan.modules.is_empty() {
        println!("No modules selected.");
        return Ok(());
    }

    let exec_config = build_execution_config(cli, config)?;
    let report = run_suite(&plan.modules, exec_config);
    let output = render(&report, format)?;

    // Write output
    let path = cli
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    if let Some(path) = path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    // Exit with appropriate code
    if report.has_failures() {
        eprintln!("\n{} module(s) failed", report.summary.failed);
        std::process::exit(1);
    }

    Ok(())
}
