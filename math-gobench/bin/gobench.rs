use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;
use math_gobench::algorithms::{ALGORITHM_NAMES, describe};
use math_gobench::report::{summarize, write_csv};
use math_gobench::{BenchConfig, Benchmarker, ExecutionMode};
use math_test_functions::FunctionRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "gobench",
    about = "Benchmark global optimization algorithms on standard test functions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the benchmark sweep and write one record per (function, algorithm)
    Run(RunArgs),
    /// Aggregate the records of a results folder
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file; command-line options override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of runs for each function and algorithm, each with its own seed
    #[arg(long)]
    nb_runs: Option<usize>,

    /// Folder receiving the result records
    #[arg(long)]
    output_folder: Option<PathBuf>,

    /// Comma separated function names (default: every registered function)
    #[arg(long, value_delimiter = ',')]
    functions: Option<Vec<String>>,

    /// Comma separated algorithm names (default: all, see --list-methods)
    #[arg(long, value_delimiter = ',')]
    methods: Option<Vec<String>>,

    /// Also run the selected scalable functions in higher dimensions
    #[arg(long)]
    multidim: bool,

    /// Comma separated dimensions used with --multidim
    #[arg(long, value_delimiter = ',')]
    dimensions: Option<Vec<usize>>,

    /// Maximum number of objective calls per run
    #[arg(long)]
    budget: Option<usize>,

    /// Number of concurrent jobs (default: available cores, or NB_CORES in cluster mode)
    #[arg(long)]
    cores: Option<usize>,

    /// Shard index; selects cluster mode together with --cores
    #[arg(long, requires = "cores")]
    section: Option<usize>,

    /// Write the effective configuration to this JSON file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// List all available functions and exit
    #[arg(long)]
    list_functions: bool,

    /// List all available algorithms and exit
    #[arg(long)]
    list_methods: bool,

    /// List functions whose optimum is the centre of their bounds and exit
    #[arg(long)]
    list_centered: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Folder holding the result records
    #[arg(long, default_value = "DATA")]
    results_folder: PathBuf,

    /// CSV file receiving the summary
    #[arg(long, default_value = "results.csv")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Report(args) => report(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let registry = FunctionRegistry::new();
    if args.list_functions {
        for name in registry.names() {
            if let Some(entry) = registry.get(&name) {
                let kind = if entry.scalable { "N-D" } else { "fixed" };
                println!("{:<18} {:>3}  {}", name, entry.default_dimension, kind);
            }
        }
        return Ok(());
    }
    if args.list_methods {
        for name in ALGORITHM_NAMES {
            println!("{:<10} {}", name, describe(name).unwrap_or_default());
        }
        return Ok(());
    }
    if args.list_centered {
        for name in registry.centered_optimum_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    if let Some(path) = &args.save_config {
        config
            .to_file(path)
            .with_context(|| format!("writing configuration {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }
    info!(
        "Sweep: {} runs, budget {}, output {}",
        config.nb_runs,
        config.run.call_budget,
        config.output_folder.display()
    );

    let start = Instant::now();
    let benchmarker = Arc::new(Benchmarker::new(config)?);
    let report = benchmarker.run()?;
    info!(
        "Done in {:.1}s: {} jobs completed, {} failed",
        start.elapsed().as_secs_f64(),
        report.completed,
        report.failed
    );
    if report.failed > 0 {
        bail!("{} jobs did not complete", report.failed);
    }
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<BenchConfig> {
    let mut config = match &args.config {
        Some(path) => BenchConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => BenchConfig::default(),
    };

    if let Some(v) = args.nb_runs {
        config.nb_runs = v;
    }
    if let Some(v) = &args.output_folder {
        config.output_folder = v.clone();
    }
    if let Some(v) = &args.functions {
        config.functions = Some(v.clone());
    }
    if let Some(v) = &args.methods {
        config.methods = Some(v.clone());
    }
    if args.multidim {
        config.multidim = true;
    }
    if let Some(v) = &args.dimensions {
        config.dimensions = v.clone();
    }
    if let Some(v) = args.budget {
        config.run.call_budget = v;
    }

    config.execution = match (args.section, args.cores) {
        (Some(section), Some(cores)) => ExecutionMode::Cluster { section, cores },
        (None, Some(cores)) => ExecutionMode::Local { cores },
        _ if args.config.is_some() && std::env::var_os("USE_CLUSTER").is_none() => {
            config.execution
        }
        _ => ExecutionMode::from_env()?,
    };

    config.validate()?;
    Ok(config)
}

fn report(args: ReportArgs) -> Result<()> {
    let summaries = summarize(&args.results_folder)
        .with_context(|| format!("reading records from {}", args.results_folder.display()))?;
    write_csv(&summaries, &args.out)?;
    info!(
        "{} records summarized into {}",
        summaries.len(),
        args.out.display()
    );
    Ok(())
}
