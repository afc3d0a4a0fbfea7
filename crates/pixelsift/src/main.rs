use clap::Parser;
use tracing_subscriber::EnvFilter;

use pixelsift::cli::{Cli, Command};
use pixelsift::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pixelsift=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Command::Compare {
            expected,
            actual,
            diff_output,
            json,
            overrides,
        } => commands::compare(expected, actual, diff_output, json, overrides).await?,
        Command::Batch {
            manifest,
            diff_dir,
            json,
            overrides,
        } => commands::batch(manifest, diff_dir, json, overrides).await?,
    };
    std::process::exit(code);
}
