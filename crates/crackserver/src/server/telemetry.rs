//! # Logging
//!
//! Structured logs go through `tracing`, rendered by a `tracing_subscriber`
//! `fmt` layer on stderr. Verbosity follows `RUST_LOG` (default `info`), e.g.
//!
//! ```bash
//! RUST_LOG=crackserver=debug,crackserver_core=trace crackserver --port 0
//! ```
//!
//! Output that clients and operators parse (the announced port and the
//! statistics report) is written to stderr directly and never passes through
//! this layer.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
