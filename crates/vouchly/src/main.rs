mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vouchly_core::{ConnectionConfig, Coordinator};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `options` only reads the declared bounds table; no connection needed.
    if matches!(cli.command, Command::Options) {
        return commands::options_cmd::handle(&cli.global);
    }

    let mut config = build_connection_config(&cli.global)?;
    if let Command::Watch { interval } = &cli.command {
        config.refresh_interval_secs = *interval;
    }
    let coordinator = Coordinator::new(config);

    coordinator.connect().await?;
    tracing::debug!(command = ?cli.command, "dispatching command");

    let result = commands::dispatch(cli.command, &coordinator, &cli.global).await;
    coordinator.close().await;
    result
}

/// Build a `ConnectionConfig` from CLI flags and environment variables.
fn build_connection_config(global: &cli::GlobalOpts) -> Result<ConnectionConfig, CliError> {
    let host = global.host.clone().ok_or(CliError::MissingArgument {
        field: "host".into(),
    })?;
    let username = global.username.clone().ok_or(CliError::NoCredentials)?;
    let password = global.password.clone().ok_or(CliError::NoCredentials)?;

    Ok(ConnectionConfig {
        host,
        port: global.port,
        site: global.site.clone(),
        username,
        password: secrecy::SecretString::from(password),
        verify_tls: global.verify_tls,
        timeout: std::time::Duration::from_secs(global.timeout),
        // One-shot commands refresh explicitly; only `watch` polls.
        refresh_interval_secs: 0,
    })
}
