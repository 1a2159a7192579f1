mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mmpack_lib::consts::APP_NAME;
use mmpack_lib::layout::LayoutMode;

use crate::output::OutputFormat;

/// mmpack - Metamod:Source plugin packager
#[derive(Parser)]
#[command(name = "mmpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Assemble the package plan for every target in a manifest
  Plan(PlanArgs),

  /// Print the descriptor that would be generated for one binary
  Descriptor(DescriptorArgs),

  /// Parse a descriptor file and print its fields
  Inspect {
    /// Path to the .vdf file
    file: PathBuf,
  },

  /// Show the host platform and the layout rule that applies to it
  Info,
}

#[derive(Args)]
pub struct PlanArgs {
  /// Target manifest produced by the build graph
  #[arg(short, long)]
  pub targets: PathBuf,

  /// Build output root (descriptors are written here)
  #[arg(short, long, default_value = ".")]
  pub build_root: PathBuf,

  /// Package tree root (default: <build-root>/package)
  #[arg(short, long)]
  pub package_root: Option<PathBuf>,

  /// Layout mode: full or minimal
  #[arg(short, long, default_value_t = LayoutMode::Full)]
  pub mode: LayoutMode,

  /// Config file copied into the plugin's configs folder (full mode)
  #[arg(short, long)]
  pub config_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct DescriptorArgs {
  /// Path to the compiled binary
  pub binary: PathBuf,

  /// Build output root relative binary paths resolve against
  #[arg(short, long, default_value = ".")]
  pub build_root: PathBuf,

  /// Package tree root (default: <build-root>/package)
  #[arg(short, long)]
  pub package_root: Option<PathBuf>,

  /// Target platform (default: host)
  #[arg(long)]
  pub platform: Option<String>,

  /// Target architecture (default: host)
  #[arg(long)]
  pub arch: Option<String>,

  /// Layout mode: full or minimal
  #[arg(short, long, default_value_t = LayoutMode::Full)]
  pub mode: LayoutMode,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    let var = format!("{}_LOG", APP_NAME.to_uppercase());
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::from_default_env())
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Plan(args) => cmd::cmd_plan(&args, cli.output, cli.verbose),
    Commands::Descriptor(args) => cmd::cmd_descriptor(&args, cli.output),
    Commands::Inspect { file } => cmd::cmd_inspect(&file, cli.output),
    Commands::Info => cmd::cmd_info(cli.output),
  }
}
