mod config;
mod logging;
mod recorder;

use clap::Parser;
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

/// Relays fuzzing dashboard API calls to one or more dashboards.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on [default: 8724]
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to listen on [default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Dashboard to forward calls to. Repeatable, or comma separated.
    #[arg(short, long, value_delimiter = ',')]
    forward: Vec<Url>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    config.apply_overrides(cli.host, cli.port, cli.forward);

    let _sentry_guard = match logging::init(config.common.logging.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("could not set up logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let metrics = match recorder::init(config.common.metrics.as_ref()) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up metrics");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fanout::run(config.relay, metrics).await {
        tracing::error!(error = %e, "Relay stopped");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
