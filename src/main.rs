use anyhow::Result;
use clap::Parser;
use tally::cli::{exit_code, Cli};
use tally::settings::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.run(settings).await {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
    Ok(())
}
