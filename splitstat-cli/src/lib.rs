#![warn(missing_docs)]
//! Splitstat CLI Library
//!
//! Command-line front end for A/B conversion experiment analysis.
//! Use `splitstat::run()` (or `splitstat_cli::run()`) in a main function to
//! get the full splitstat CLI.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     splitstat_cli::run()
//! }
//! ```

mod config;
mod executor;

pub use config::*;
pub use executor::{
    SEPARATOR_WIDTH, analyze, format_human_output, plan_sample_size, run_all, summarize,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use splitstat_data::Dataset;
use splitstat_report::{
    OutputFormat, Report, ReportConfig, generate_csv_report, generate_json_report,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Splitstat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "splitstat")]
#[command(author, version, about = "Splitstat - A/B conversion experiment analysis")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to splitstat.toml discovered from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print diagnostics, then run the z-test and the chi-squared test
    Run {
        /// Delimited text file with a header row
        #[arg(name = "FILE")]
        file: PathBuf,

        /// Per-group sample size for the z-test (defaults to the smaller group)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Seed for balanced sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Significance level
        #[arg(long)]
        alpha: Option<f64>,

        /// Apply Yates' continuity correction to the chi-squared test
        #[arg(long)]
        yates: bool,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print dataset diagnostics only
    Summary {
        /// Delimited text file with a header row
        #[arg(name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compute the per-group sample size needed to detect an effect
    Power {
        /// Conversion rate of the control experience
        #[arg(long)]
        base_rate: f64,

        /// Minimal absolute lift to detect
        #[arg(long)]
        effect: f64,

        /// Target statistical power
        #[arg(long)]
        power: Option<f64>,

        /// Significance level
        #[arg(long)]
        alpha: Option<f64>,

        /// Treatment-to-control size ratio
        #[arg(long)]
        ratio: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print a default splitstat.toml
    Init,
}

/// Input options shared by dataset commands
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Drop duplicate records before analysis, keeping the first per identity.
    /// Optionally name the identity column as `--dedup=COLUMN`; defaults to
    /// config or `user_id`
    #[arg(long, value_name = "COLUMN", num_args = 0..=1, require_equals = true)]
    pub dedup: Option<Option<String>>,

    /// Field delimiter (defaults to config or ",")
    #[arg(long)]
    pub delimiter: Option<String>,
}

/// Output options shared by reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the splitstat CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the splitstat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays machine-readable
    let filter = if cli.verbose {
        "splitstat=debug"
    } else {
        "splitstat=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    // Explicit --config wins, then discovered splitstat.toml, then defaults
    let config = match &cli.config {
        Some(path) => SplitstatConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SplitstatConfig::discover().unwrap_or_default(),
    };

    match cli.command {
        Commands::Run {
            ref file,
            samples,
            seed,
            alpha,
            yates,
            ref input,
            ref output,
        } => {
            let mut test = config.test.clone();
            if let Some(seed) = seed {
                test.seed = seed;
            }
            if let Some(alpha) = alpha {
                test.alpha = alpha;
            }
            if let Some(samples) = samples {
                test.sample_size = Some(samples);
            }
            test.yates_correction |= yates;
            run_analysis(file, input, output, &config, &test)?;
        }
        Commands::Summary {
            ref file,
            ref input,
            ref output,
        } => {
            run_summary(file, input, output, &config)?;
        }
        Commands::Power {
            base_rate,
            effect,
            power,
            alpha,
            ratio,
            ref output,
        } => {
            let mut defaults = config.power.clone();
            if let Some(power) = power {
                defaults.power = power;
            }
            if let Some(alpha) = alpha {
                defaults.alpha = alpha;
            }
            if let Some(ratio) = ratio {
                defaults.ratio = ratio;
            }
            let report = plan_sample_size(base_rate, effect, &defaults.power_config())?;
            emit(&report, output, &config)?;
        }
        Commands::Init => {
            print!("{}", SplitstatConfig::default_toml());
        }
    }

    Ok(())
}

/// Load a dataset and apply deduplication, returning the dataset and the
/// report settings describing what was done to it.
fn load_dataset(
    file: &Path,
    input: &InputArgs,
    config: &SplitstatConfig,
) -> anyhow::Result<(Dataset, ReportConfig)> {
    let mut schema = config.data.schema()?;
    if let Some(delimiter) = &input.delimiter {
        schema.delimiter = parse_delimiter(delimiter)?;
    }

    let mut dataset = Dataset::from_path(file, schema)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let mut report_config = ReportConfig::default();
    if let Some(column) = resolve_dedup_column(&input.dedup, config) {
        let before = dataset.len();
        dataset.drop_duplicates(&column)?;
        report_config.duplicates_removed = before - dataset.len();
        report_config.dedup_column = Some(column);
    }

    Ok((dataset, report_config))
}

/// `--dedup=COLUMN` wins, bare `--dedup` uses the configured identity column,
/// and without the flag the config's `dedup` switch decides.
fn resolve_dedup_column(
    flag: &Option<Option<String>>,
    config: &SplitstatConfig,
) -> Option<String> {
    match flag {
        Some(Some(column)) => Some(column.clone()),
        Some(None) => Some(config.data.identity_column.clone()),
        None if config.data.dedup => Some(config.data.identity_column.clone()),
        None => None,
    }
}

fn run_analysis(
    file: &Path,
    input: &InputArgs,
    output: &OutputArgs,
    config: &SplitstatConfig,
    test: &TestConfig,
) -> anyhow::Result<()> {
    let (dataset, loaded) = load_dataset(file, input, config)?;
    let report_config = ReportConfig {
        dedup_column: loaded.dedup_column,
        duplicates_removed: loaded.duplicates_removed,
        ..ReportConfig::from_analyzer(&test.analyzer_config(), test.sample_size)
    };
    let source = Some(file.display().to_string());
    debug!(?report_config, "running analysis");

    if resolve_format(output, config)? == OutputFormat::Human {
        let mut sink = open_sink(output.output.as_deref())?;
        run_all(&dataset, source, report_config, &mut sink)?;
        sink.flush()?;
        return Ok(());
    }

    let report = analyze(&dataset, source, report_config)?;
    emit(&report, output, config)
}

fn run_summary(
    file: &Path,
    input: &InputArgs,
    output: &OutputArgs,
    config: &SplitstatConfig,
) -> anyhow::Result<()> {
    let (dataset, loaded) = load_dataset(file, input, config)?;
    let report_config = ReportConfig {
        dedup_column: loaded.dedup_column,
        duplicates_removed: loaded.duplicates_removed,
        ..ReportConfig::from_analyzer(&config.test.analyzer_config(), None)
    };
    let report = summarize(&dataset, Some(file.display().to_string()), report_config);
    emit(&report, output, config)
}

/// CLI format wins, then `[output] format`
fn resolve_format(output: &OutputArgs, config: &SplitstatConfig) -> anyhow::Result<OutputFormat> {
    output
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)
}

/// Render a report and write it to the requested destination
fn emit(report: &Report, output: &OutputArgs, config: &SplitstatConfig) -> anyhow::Result<()> {
    let rendered = match resolve_format(output, config)? {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    };

    let mut sink = open_sink(output.output.as_deref())?;
    sink.write_all(rendered.as_bytes())?;
    sink.flush()?;
    Ok(())
}

fn open_sink(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            info!(path = %path.display(), "writing report");
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
