use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod context;
mod format;

use context::{AppContext, VerbosityLevel};

/// Cudex - CUDA Base Image Catalog
///
/// Lists the nvidia/cuda images that ship cuDNN and the exact CUDA and cuDNN
/// versions inside each of them.
#[derive(Parser, Debug)]
#[command(name = "cudex")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Config file (default: ~/.config/cudex/config.yaml when present)
    #[arg(long, global = true, env = "CUDEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the catalog of cuDNN-enabled CUDA images
    Catalog {
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Write the catalog to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Maximum number of images inspected at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Pick a devel base image for a CUDA toolkit version
    Select {
        /// CUDA toolkit version (e.g. 11.8 or 11.8.0)
        #[arg(long)]
        cuda: String,
        /// cuDNN major version (e.g. 8)
        #[arg(long)]
        cudnn: Option<String>,
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Maximum number of images inspected at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Display version information
    Version,
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let color = format::ColorChoice::from(cli.color.as_str());
    let verbosity = VerbosityLevel::from_count(cli.verbose);

    init_tracing(verbosity);

    match cli.command {
        Commands::Version => {
            commands::version::print_version();
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
        Commands::Catalog {
            format,
            output,
            concurrency,
        } => {
            let ctx = load_context(color, verbosity, cli.config.as_deref(), concurrency);
            let fmt = format::OutputFormat::from(format.as_str());
            commands::catalog::handle_catalog(&ctx, fmt, output.as_deref()).await;
        }
        Commands::Select {
            cuda,
            cudnn,
            format,
            concurrency,
        } => {
            let ctx = load_context(color, verbosity, cli.config.as_deref(), concurrency);
            let fmt = format::OutputFormat::from(format.as_str());
            commands::select::handle_select(&ctx, &cuda, cudnn.as_deref(), fmt).await;
        }
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Build context with precedence: defaults > config file > env vars > CLI flags
fn load_context(
    color: format::ColorChoice,
    verbosity: VerbosityLevel,
    config: Option<&std::path::Path>,
    concurrency: Option<usize>,
) -> AppContext {
    match AppContext::build(color, verbosity, config) {
        Ok(ctx) => ctx.with_concurrency(concurrency),
        Err(e) => {
            format::create_formatter(color).error(&e);
            std::process::exit(1);
        }
    }
}
