mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::RecipeArgs;
use crate::output::OutputFormat;

/// magnum-recipe - Packaging recipe for Magnum-Plugins
#[derive(Parser)]
#[command(name = "magnum-recipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(flatten)]
  recipe: RecipeArgs,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show recipe metadata and the target platform
  Info {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// List the resolved options
  Options {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// List declared dependencies and the options passed to them
  Deps {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Print the CMake build configuration
  Configure {
    /// Also write the cache script into the generators folder
    #[arg(long)]
    write: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Fetch and patch the source
  Source {
    /// Destination folder (default: the work folder's source_subfolder)
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Fetch, configure, build and package
  Create {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Info { output } => cmd::cmd_info(&cli.recipe, output),
    Commands::Options { output } => cmd::cmd_options(&cli.recipe, output),
    Commands::Deps { output } => cmd::cmd_deps(&cli.recipe, output),
    Commands::Configure { write, output } => cmd::cmd_configure(&cli.recipe, write, output),
    Commands::Source { dest, output } => cmd::cmd_source(&cli.recipe, dest, output),
    Commands::Create { output } => cmd::cmd_create(&cli.recipe, output),
  }
}
