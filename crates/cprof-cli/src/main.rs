mod commands;

use clap::{Parser, Subcommand};
use cprof_core::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cprof-cli")]
#[command(about = "Resolve creator profiles from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a handle through the platform's provider chain and print the profile as JSON
    Resolve {
        /// instagram, tiktok or youtube
        #[arg(long)]
        platform: Platform,

        /// Bare username, @handle, or profile URL
        handle: String,

        /// Also print the per-provider attempt log to stderr
        #[arg(long)]
        report: bool,
    },
    /// Print the synthetic placeholder profile for a handle without any network calls
    Synthetic {
        #[arg(long)]
        platform: Platform,

        handle: String,
    },
    /// List each platform's provider chain and whether each provider is configured
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cprof_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve {
            platform,
            handle,
            report,
        } => commands::run_resolve(&config, platform, &handle, report).await,
        Commands::Synthetic { platform, handle } => commands::run_synthetic(platform, &handle),
        Commands::Providers => commands::run_providers(&config),
    }
}
