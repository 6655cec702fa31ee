//! Thin CLI entry point: parses arguments, resolves a [`RunConfig`], and calls into the
//! `cage_forge` library. Kept free of any logic the library itself could own, mirroring the
//! teacher's `dreid_typer` library never touching `std::process::exit` itself.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cage_forge::config::{RunConfig, RunConfigOverrides};
use cage_forge::orchestrator;

/// Combinatorial generation of covalent molecular cages around a substrate.
#[derive(Debug, Parser)]
#[command(name = "cage-forge", version, about)]
struct Cli {
    /// Substrate geometry in XYZ format.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Alpha-shape resolution parameter (typical range 2.5-4.0).
    #[arg(short = 'a', long = "alpha")]
    alpha: Option<f32>,

    /// Maximum number of atoms a synthesized chain may add between one endpoint pair.
    #[arg(short = 's', long = "size-max")]
    size_max: Option<usize>,

    /// Stop enumeration once this many cages have been emitted.
    #[arg(short = 'r', long = "max-results")]
    max_results: Option<usize>,

    /// Optional TOML config file; CLI flags override any value it sets.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Permit a chain to start with a carbonyl (C=O) motif rather than a bare atom.
    #[arg(long)]
    allow_carbonyl_start: bool,

    /// Require at least one aromatic ring somewhere in a chain before it may close.
    #[arg(long)]
    require_aromatic_in_chain: bool,

    /// Override for the covalent-radius table; omit to use the bundled default table.
    #[arg(long)]
    radius_table: Option<PathBuf>,

    /// Directory the `results/<basename>/...` tree is rooted under.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn resolve_config(cli: &Cli) -> Result<RunConfig, cage_forge::CageError> {
    let base = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| cage_forge::CageError::InputMissing {
                path: path.clone(),
                source,
            })?;
            RunConfig::from_toml(&content)?
        }
        None => RunConfig::default(),
    };

    let overrides = RunConfigOverrides {
        input: Some(cli.input.clone()),
        alpha: cli.alpha,
        size_max: cli.size_max,
        max_results: cli.max_results,
        allow_carbonyl_start: cli.allow_carbonyl_start,
        require_aromatic_in_chain: cli.require_aromatic_in_chain,
        radius_table: cli.radius_table.clone(),
        output_dir: cli.output_dir.clone(),
    };
    Ok(base.merged_with(overrides))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match orchestrator::run(&config) {
        Ok(summary) => {
            println!(
                "wrote {} cage(s) for '{}' under {}",
                summary.cages_written,
                summary.basename,
                summary.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
