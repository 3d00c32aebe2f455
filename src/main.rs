//! Roam CLI entry point.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use roam::cli::{Cli, Commands};
use roam::config::{ConfigFile, DashboardConfig, LayeredSource, assemble, settings};
use roam::session::{SessionServer, shutdown_signal};
use roam::{Error, dashboard, logging};
use tokio_util::sync::CancellationToken;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let file = ConfigFile::load(cli.config.as_deref())?;
    let source = LayeredSource::new()
        .with_flags(cli.flag_values())
        .with_process_env()
        .with_file(file);

    let assembled = assemble(&source, None)?;
    for warning in &assembled.warnings {
        println!("{}", warning);
    }
    let config = assembled.config;

    match cli.command {
        None => run_local(config),
        Some(Commands::Serve { .. }) => {
            let addr = settings::listen_address(&source)?;
            run_serve(config, &addr)
        }
        Some(Commands::Config) => {
            let json = serde_json::to_string_pretty(&config.to_json())
                .map_err(|e| Error::Other(format!("failed to render config: {}", e)))?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))
}

fn run_local(config: DashboardConfig) -> Result<(), Error> {
    logging::init(logging::LOCAL_LOG_DIRECTIVE);

    let runtime = runtime()?;
    let result = runtime.block_on(dashboard::run_local(Arc::new(config)));
    // The stdin reader blocks a worker thread until the next keypress.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

fn run_serve(config: DashboardConfig, addr: &str) -> Result<(), Error> {
    logging::init(logging::SERVE_LOG_DIRECTIVE);

    let result = runtime()?.block_on(async {
        let signal = shutdown_signal();
        let handler = dashboard::session_handler(Arc::new(config));
        let server = SessionServer::bind(addr, handler).await?;

        let shutdown = CancellationToken::new();
        let signal_shutdown = shutdown.clone();
        tokio::spawn(async move {
            signal.await;
            signal_shutdown.cancel();
        });

        server.serve(shutdown).await
    });

    if let Err(e @ (Error::BindFailure { .. } | Error::ShutdownTimeout(_))) = &result {
        tracing::error!(error = %e, "session server failed");
    }
    result
}
