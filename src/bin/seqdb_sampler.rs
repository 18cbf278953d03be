use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use seqdb_sampler::app::{App, RunOptions};
use seqdb_sampler::config::{
    ConfigLoader, ConfigOverrides, ResolvedConfig, RunEntry, RunEntryObject, SeedMode,
};
use seqdb_sampler::domain::{FirstOnlyAccessions, StrategyName};
use seqdb_sampler::error::SeqdbError;
use seqdb_sampler::mapping::MappingStore;
use seqdb_sampler::output::{ConsoleOutput, JsonOutput, OutputMode, PlanView};
use seqdb_sampler::store::SourceStore;

#[derive(Parser)]
#[command(name = "seqdb-sampler")]
#[command(about = "Build protein/nucleotide FASTA database variants from a species-taxon-accession mapping")]
#[command(version, author)]
struct Cli {
    /// Print results as JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Run-plan file (defaults to ./seqdb.json when present).
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true, value_enum)]
    seed_mode: Option<SeedMode>,

    #[arg(long, global = true, value_enum)]
    first_only_accessions: Option<FirstOnlyAccessions>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Build every database in the run plan")]
    Build(WriteArgs),
    #[command(about = "Build the databases of a single strategy")]
    Run(RunArgs),
    #[command(about = "Show the resolved run plan")]
    Plan,
}

#[derive(Args, Clone, Copy)]
struct WriteArgs {
    /// Append to existing output files instead of starting them fresh.
    #[arg(long)]
    append: bool,

    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct RunArgs {
    #[arg(value_enum)]
    strategy: StrategyName,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    fraction: Option<f64>,

    #[arg(long)]
    replicates: Option<u32>,

    #[command(flatten)]
    write: WriteArgs,
}

impl From<WriteArgs> for RunOptions {
    fn from(args: WriteArgs) -> Self {
        Self {
            fresh: !args.append,
            dry_run: args.dry_run,
        }
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<SeqdbError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &SeqdbError) -> u8 {
    match error {
        SeqdbError::MappingRead(_)
        | SeqdbError::MappingParse(_)
        | SeqdbError::ConfigRead(_)
        | SeqdbError::ConfigParse(_)
        | SeqdbError::AllowlistRead(_)
        | SeqdbError::InvalidRun(_)
        | SeqdbError::InvalidStrategy(_)
        | SeqdbError::InvalidFraction(_) => 2,
        SeqdbError::SourceRead { .. } | SeqdbError::OutputWrite { .. } | SeqdbError::Filesystem(_) => {
            3
        }
        SeqdbError::InvalidSpecies(_)
        | SeqdbError::InvalidTaxonId(_)
        | SeqdbError::InvalidAccession(_) => 1,
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
        OutputMode::Human
    };
    let overrides = ConfigOverrides {
        seed: cli.seed,
        seed_mode: cli.seed_mode,
        first_only_accessions: cli.first_only_accessions,
    };
    let mut config = ConfigLoader::resolve(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Commands::Plan => print_plan(&PlanView::from(&config), output_mode),
        Commands::Build(args) => run_build(&config, args.into(), output_mode),
        Commands::Run(args) => {
            let entry = RunEntry::Detailed(RunEntryObject {
                name: args.name,
                fraction: args.fraction,
                replicates: args.replicates,
                ..RunEntryObject::new(args.strategy)
            });
            config.runs = config.expand(&entry, 0)?;
            run_build(&config, args.write.into(), output_mode)
        }
    }
}

fn run_build(
    config: &ResolvedConfig,
    options: RunOptions,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let mapping = MappingStore::load(config.mapping_path.as_std_path())?;
    let store = SourceStore::new(config.protein_dir.clone(), config.nucleotide_dir.clone());
    let app = App::new(store, mapping);

    match output_mode {
        OutputMode::Json => {
            let result = app.build(config, options, &JsonOutput)?;
            JsonOutput::print_build(&result).into_diagnostic()?;
        }
        OutputMode::Human => {
            let result = app.build(config, options, &ConsoleOutput)?;
            ConsoleOutput::print_build(&result).into_diagnostic()?;
        }
    }
    Ok(())
}

fn print_plan(plan: &PlanView, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::Json => JsonOutput::print_plan(plan).into_diagnostic(),
        OutputMode::Human => ConsoleOutput::print_plan(plan).into_diagnostic(),
    }
}
