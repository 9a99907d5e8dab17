#![forbid(unsafe_code)]

mod cmd;
mod fixtures;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use scx_core::config::resolve_config;
use scx_core::timing;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "scx: scripture citation extraction and hybrid passage search",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Mode used before configuration has been resolved.
    const fn fallback_output(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(next_help_heading = "Read")]
    Extract(cmd::extract::ExtractArgs),

    #[command(next_help_heading = "Read")]
    Search(cmd::search::SearchArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    scx completions bash\n\n    # Generate zsh completions\n    scx completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCX_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "scx=debug,info"
        } else {
            "scx=info,warn"
        })
    });

    let format = env::var("SCX_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // stdout carries command output.
    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(e) => {
            render_error(cli.fallback_output(), &CliError::from(&e))?;
            return Err(e.into());
        }
    };
    let output = OutputMode::from_resolved(&config.resolved_output);
    debug!(output = %config.resolved_output, "resolved configuration");

    let command_result = match cli.command {
        Commands::Extract(ref args) => {
            timing::timed("cmd.extract", || cmd::extract::run_extract(args, output))
        }
        Commands::Search(ref args) => timing::timed("cmd.search", || {
            cmd::search::run_search(args, output, &config.project)
        }),
        Commands::Completions(ref args) => timing::timed("cmd.completions", || {
            let stdout = std::io::stdout();
            cmd::completions::run_completions(args, Cli::command(), &mut stdout.lock())
        }),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}
