//! melspec - Inspect log-mel features computed from raw PCM captures.

use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigArgs, ConfigCommand, ExtractCommand, FilterbankCommand};

/// melspec - compute and inspect log-mel spectrograms.
///
/// Input audio is raw mono PCM16 little-endian (the layout captured by the
/// board's recorder). The feature configuration defaults to the deployed
/// classifier front end and can be loaded from a YAML or JSON file, then
/// overridden per flag.
#[derive(Parser)]
#[command(name = "melspec")]
#[command(about = "Log-mel spectrogram extraction tool")]
#[command(version)]
pub struct Cli {
    /// Feature config file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub overrides: ConfigArgs,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the spectrogram of a PCM file
    Extract(ExtractCommand),
    /// Dump the mel filterbank
    Filterbank(FilterbankCommand),
    /// Print the effective configuration
    Config(ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Extract(cmd) => cmd.run(&cli),
        Commands::Filterbank(cmd) => cmd.run(&cli),
        Commands::Config(cmd) => cmd.run(&cli),
    }
}
