use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use ena_metadata_xml::app::{self, ExperimentJob, RunJob, SampleJob};
use ena_metadata_xml::config::{ConfigLoader, ResolvedConfig};
use ena_metadata_xml::error::MetadataError;
use ena_metadata_xml::experiment::Suffixes;
use ena_metadata_xml::output::{OutputMode, SummaryOutput};

#[derive(Parser)]
#[command(name = "ena-xml")]
#[command(about = "Build ENA sample, experiment and run XML from CSV sheets")]
#[command(version, author)]
struct Cli {
    /// JSON config with default paths and suffixes (default: ./ena-xml.json if present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print a JSON summary instead of "Wrote <path>"
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Convert samples.csv into samples.xml")]
    Samples(SamplesArgs),
    #[command(about = "Create experiment.xml from samples.xml and a one-row params CSV")]
    Experiments(ExperimentsArgs),
    #[command(about = "Create run.xml from an experiment_alias to fastq mapping CSV")]
    Runs(RunsArgs),
}

#[derive(Args)]
struct SamplesArgs {
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ExperimentsArgs {
    /// Path to samples.xml
    #[arg(long)]
    samples: PathBuf,

    /// CSV with one row of global experiment params
    #[arg(long)]
    params: PathBuf,

    /// Output experiment.xml path
    #[arg(long)]
    out: PathBuf,

    /// Suffix appended to experiment aliases
    #[arg(long)]
    exp_suffix: Option<String>,

    /// Suffix appended to LIBRARY_NAME
    #[arg(long)]
    lib_name_suffix: Option<String>,
}

#[derive(Args)]
struct RunsArgs {
    mapping: PathBuf,

    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<MetadataError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &MetadataError) -> u8 {
    match error {
        MetadataError::InputNotFound(_)
        | MetadataError::ConfigRead(_)
        | MetadataError::ConfigParse(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Samples(args) => app::convert_samples(&samples_job(args, &config))?,
        Commands::Experiments(args) => app::convert_experiments(&experiments_job(args, &config))?,
        Commands::Runs(args) => app::convert_runs(&runs_job(args, &config))?,
    };

    SummaryOutput::print(output_mode, &result).into_diagnostic()
}

fn samples_job(args: SamplesArgs, config: &ResolvedConfig) -> SampleJob {
    SampleJob {
        input: args.input.unwrap_or_else(|| config.samples_input.clone()),
        output: args.out.unwrap_or_else(|| config.samples_output.clone()),
    }
}

fn experiments_job(args: ExperimentsArgs, config: &ResolvedConfig) -> ExperimentJob {
    ExperimentJob {
        samples: args.samples,
        params: args.params,
        output: args.out,
        suffixes: Suffixes {
            experiment: args.exp_suffix.unwrap_or_else(|| config.exp_suffix.clone()),
            library_name: args
                .lib_name_suffix
                .unwrap_or_else(|| config.lib_name_suffix.clone()),
        },
    }
}

fn runs_job(args: RunsArgs, config: &ResolvedConfig) -> RunJob {
    RunJob {
        mapping: args.mapping,
        output: args.out.unwrap_or_else(|| config.run_output.clone()),
    }
}
