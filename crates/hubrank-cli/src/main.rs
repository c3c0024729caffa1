#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use hubrank_core::config::{self, HubrankConfig};
use hubrank_core::{HitsConfig, UpdateRule};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hubrank: HITS hub and authority scores",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of ./hubrank.toml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of power iterations to run.
    #[arg(short, long, global = true)]
    iterations: Option<usize>,

    /// Norm at or below which a score vector counts as degenerate.
    #[arg(long, global = true, value_name = "NORM", allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Hub update rule: `co-citation` or `two-step`.
    #[arg(long, global = true)]
    update: Option<UpdateRule>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self, config_format: Option<&str>) -> OutputMode {
        resolve_output_mode(self.format, self.json, config_format)
    }

    /// Layer flag overrides on top of the resolved config.
    fn hits_config(
        &self,
        settings: &HubrankConfig,
        default_iterations: Option<usize>,
    ) -> anyhow::Result<HitsConfig> {
        let mut scoring = settings.scoring.clone();
        if let Some(iterations) = self.iterations.or(default_iterations) {
            scoring.iterations = iterations;
        }
        if let Some(threshold) = self.threshold {
            scoring.degeneracy_threshold = threshold;
        }
        if let Some(update) = self.update {
            scoring.update = update;
        }
        scoring.to_hits_config()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Score the six-node reference graph",
        long_about = "Score the built-in six-node reference graph. Runs 10000 iterations unless --iterations is given.",
        after_help = "EXAMPLES:\n    # Reference run\n    hubrank sample\n\n    # Emit machine-readable output\n    hubrank sample --json"
    )]
    Sample,

    #[command(
        about = "Score a graph given on the command line",
        long_about = "Score a graph given as dense rows (--row) or as an edge list (--edge).",
        after_help = "EXAMPLES:\n    # Two-node cycle as rows\n    hubrank score --row 0,1 --row 1,0\n\n    # Chain as edges, 50 iterations\n    hubrank score --edge 0:1 --edge 1:2 -i 50\n\n    # Emit machine-readable output\n    hubrank score --edge 0:1 --json"
    )]
    Score(cmd::score::ScoreArgs),

    #[command(
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    hubrank completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("HUBRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "hubrank=debug,info"
        } else {
            "hubrank=info,warn"
        })
    });

    let format = env::var("HUBRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let settings = match config::load_config(&project_root, cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            render_error(cli.output_mode(None), &CliError::from(&err))?;
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(?settings, "resolved config");

    let output = cli.output_mode(settings.output.format.as_deref());

    let command_result = match &cli.command {
        Commands::Sample => cli
            .hits_config(&settings, Some(cmd::score::SAMPLE_ITERATIONS))
            .and_then(|config| cmd::score::run_sample(&config, output)),
        Commands::Score(args) => cli
            .hits_config(&settings, None)
            .and_then(|config| cmd::score::run_score(args, &config, output)),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    };

    match command_result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
