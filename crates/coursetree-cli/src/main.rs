#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use coursetree_core::config;
use output::{CliError, OutputMode};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ctree: course outline tooling",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides FORMAT and config).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Outline",
        about = "Find draft subtree roots",
        long_about = "Read a JSON list of draft nodes and print the topmost draft of each subtree.",
        after_help = "EXAMPLES:\n    # Roots of an exported draft list\n    ctree roots drafts.json\n\n    # Ignore sequential parents\n    ctree roots drafts.json --structural-only\n\n    # Show what each root owns, as JSON\n    ctree roots drafts.json --group --json"
    )]
    Roots(cmd::roots::RootsArgs),

    #[command(
        next_help_heading = "Content",
        about = "Substitute course keywords in text",
        long_about = "Replace %%USER_ID%%, %%USER_FULLNAME%%, %%COURSE_DISPLAY_NAME%% and %%COURSE_END_DATE%% using a JSON context.",
        after_help = "EXAMPLES:\n    # Personalize a greeting\n    ctree substitute ctx.json --text \"Hi %%USER_FULLNAME%%\"\n\n    # Personalize a whole e-mail body\n    ctree substitute ctx.json --file email.html"
    )]
    Substitute(cmd::substitute::SubstituteArgs),

    #[command(
        next_help_heading = "Content",
        about = "Summarize validation messages",
        long_about = "Show the summary and detailed validation messages of an authoring component.",
        after_help = "EXAMPLES:\n    # Render as the page root\n    ctree validation messages.json\n\n    # Render as an inline child\n    ctree validation messages.json --inline"
    )]
    Validation(cmd::validation::ValidationArgs),

    #[command(
        next_help_heading = "Project",
        about = "Show effective configuration",
        after_help = "EXAMPLES:\n    ctree config --json"
    )]
    Config,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("CTREE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "coursetree=debug,ctree=debug,info"
        } else {
            "coursetree=info,warn"
        })
    });

    let format = env::var("CTREE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

fn error_for(err: &anyhow::Error) -> CliError {
    let cli_error = CliError::new(format!("{err:#}"));
    if let Some(input) = err.downcast_ref::<cmd::InputError>() {
        return cli_error.with_code(input.code());
    }
    if let Some(config_err) = err.downcast_ref::<config::ConfigError>() {
        return cli_error.with_code(config_err.code());
    }
    cli_error
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let effective = config::resolve_config(&project_root)?;
    let output = output::resolve_output_mode(cli.format, cli.json, effective.configured_output());
    debug!(?output, "output mode resolved");

    match &cli.command {
        Commands::Roots(args) => cmd::roots::run_roots(
            args,
            effective.project.roots.use_parent_category,
            output,
        ),
        Commands::Substitute(args) => cmd::substitute::run_substitute(args, output),
        Commands::Validation(args) => cmd::validation::run_validation(args, output),
        Commands::Config => cmd::config::run_config(&effective, output),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Err(err) = run(&cli) {
        let mode = output::resolve_output_mode(cli.format, cli.json, None);
        // Rendering to stderr is best effort; the exit code still reports the failure.
        let _ = output::render_error(mode, &error_for(&err));
        std::process::exit(1);
    }
}
