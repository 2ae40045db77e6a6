//! DevSecOps demo service entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use demo_app::{build_server_config, load_config, Server, VERSION};
use demo_telemetry::init_telemetry;

/// Command-line arguments.
struct Args {
    /// Path to a configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Option<Self>, String> {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().ok_or("--config requires a path")?;
                    config = Some(PathBuf::from(path));
                }
                "--help" | "-h" => {
                    print_help();
                    return Ok(None);
                }
                "--version" | "-v" => {
                    println!("devsecops-demo-app {VERSION}");
                    return Ok(None);
                }
                other => return Err(format!("Unknown argument: {other}")),
            }
        }

        Ok(Some(Self { config }))
    }
}

fn print_help() {
    println!(
        r"DevSecOps Demo App - calculator and health service

USAGE:
    devsecops-demo-app [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    PORT                   Listen port (default: 3000)
    HOST                   Listen host (default: 0.0.0.0)
    APP_ENV                development | production | test (default: development)
    DEMO_CONFIG_FILE       Configuration file, unless --config is given
    DEMO__SECTION__KEY     Override any setting, e.g. DEMO__LOGGING__FORMAT=json
    RUST_LOG               Log filter, overrides the configured level
"
    );
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    init_telemetry(&config.log_config(), &config.metrics_config())
        .context("Failed to initialize telemetry")?;

    let server = Server::new(build_server_config(&config)?);
    server.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Use --help for usage information");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Server error");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
