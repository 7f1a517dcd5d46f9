use clap::{CommandFactory, Parser};
use crackserver::server::{
    admission::Admission,
    config::{CliArgs, ServerConfig},
    exit::ExitStatus,
    listener::Server,
    session::SessionHandler,
    signals::{forward_report_signal, shutdown_signal},
    telemetry::init_telemetry,
};
use crackserver_core::{Dictionary, ReportTrigger, Statistics, spawn_reporter};
use std::{io::Write, process::ExitCode, sync::Arc};

// Crack jobs allocate per worker on every request; mimalloc keeps that cheap
// under contention.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    // Load from .env
    let _ = dotenvy::dotenv();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitStatus::Usage.into()
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("crackserver: {e}");
            eprintln!("{}", CliArgs::command().render_usage());
            return ExitStatus::Usage.into();
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("crackserver: {e}");
            ExitStatus::of(&e).into()
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    if let Err(e) = init_telemetry() {
        eprintln!("crackserver: failed to initialise logging: {e}");
    }

    let dictionary = Arc::new(Dictionary::load(&config.dictionary)?);
    let stats = Arc::new(Statistics::new());

    let (trigger, reports) = ReportTrigger::new();
    let _reporter = spawn_reporter(Arc::clone(&stats), reports);
    // Without SIGHUP the server still runs; it just cannot be asked for a report.
    let _hangup = match forward_report_signal(trigger) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGHUP handler, reports disabled");
            None
        }
    };

    let server = Server::bind(
        &config.bind_addr(),
        Admission::new(config.max_connections),
        SessionHandler::new(Arc::clone(&dictionary), stats),
    )
    .await?;

    announce_port(server.local_addr().port())?;
    log_startup_info(&server, &config, &dictionary);

    server.run(shutdown_signal()).await;
    tracing::info!("Service shut down successfully");
    Ok(())
}

/// Clients discover an OS-chosen port by reading this line.
fn announce_port(port: u16) -> std::io::Result<()> {
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{port}")?;
    stderr.flush()
}

fn log_startup_info(server: &Server, config: &ServerConfig, dictionary: &Dictionary) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting crack service on {} with full config: {:#?}",
            server.local_addr(),
            config
        );
    } else {
        tracing::info!(
            "Starting crack service on {} with {} words, max connections {:?}",
            server.local_addr(),
            dictionary.len(),
            config.max_connections
        );
    }
}
