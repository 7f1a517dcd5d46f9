//! Process-wide request statistics.
//!
//! [`Statistics`] is shared by reference (`Arc<Statistics>`) with every
//! session and crack worker. All seven counters sit behind one
//! [`parking_lot::Mutex`], so a snapshot is never torn by a concurrent
//! increment.
//!
//! Reports are produced by a dedicated task started with [`spawn_reporter`].
//! It sleeps on a channel until a [`ReportTrigger`] fires, then prints one
//! [`StatsSnapshot`] to stderr. The event source (an OS signal, an admin
//! command, a test) lives outside this module.

use core::fmt;
use parking_lot::Mutex;
use std::{io::Write, sync::Arc};
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

/// A consistent copy of every counter, taken under the statistics lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Sessions currently open.
    pub connected_clients: u64,
    /// Sessions that have ended.
    pub completed_clients: u64,
    /// `crack` requests received with a valid field count.
    pub crack_requests: u64,
    /// Crack jobs that exhausted the dictionary.
    pub failed_cracks: u64,
    /// Crack jobs that found the word.
    pub successful_cracks: u64,
    /// `crypt` requests received with a valid field count.
    pub crypt_requests: u64,
    /// Hash computations performed by crypt requests and crack workers.
    pub hash_computations: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Connected clients: {}", self.connected_clients)?;
        writeln!(f, "Completed clients: {}", self.completed_clients)?;
        writeln!(f, "Crack requests: {}", self.crack_requests)?;
        writeln!(f, "Failed crack requests: {}", self.failed_cracks)?;
        writeln!(f, "Successful crack requests: {}", self.successful_cracks)?;
        writeln!(f, "Crypt requests: {}", self.crypt_requests)?;
        writeln!(f, "crypt()/crypt_r() calls: {}", self.hash_computations)
    }
}

/// Lock-guarded counter set shared across the whole server.
#[derive(Debug, Default)]
pub struct Statistics {
    counters: Mutex<StatsSnapshot>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every counter under the lock.
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.counters.lock()
    }

    fn update(&self, f: impl FnOnce(&mut StatsSnapshot)) {
        f(&mut *self.counters.lock());
    }

    pub fn client_connected(&self) {
        self.update(|c| c.connected_clients += 1);
    }

    /// Moves one session from connected to completed in a single critical
    /// section.
    pub fn client_disconnected(&self) {
        self.update(|c| {
            c.connected_clients = c.connected_clients.saturating_sub(1);
            c.completed_clients += 1;
        });
    }

    pub fn crack_requested(&self) {
        self.update(|c| c.crack_requests += 1);
    }

    pub fn crack_failed(&self) {
        self.update(|c| c.failed_cracks += 1);
    }

    pub fn crack_succeeded(&self) {
        self.update(|c| c.successful_cracks += 1);
    }

    pub fn crypt_requested(&self) {
        self.update(|c| c.crypt_requests += 1);
    }

    pub fn hash_computed(&self) {
        self.update(|c| c.hash_computations += 1);
    }
}

/// Cloneable handle that asks the reporting task for a statistics report.
#[derive(Debug, Clone)]
pub struct ReportTrigger {
    tx: mpsc::Sender<()>,
}

impl ReportTrigger {
    /// Creates a trigger and the receiver to hand to [`spawn_reporter`].
    pub fn new() -> (Self, mpsc::Receiver<()>) {
        // One slot: a burst of requests while a report is pending collapses
        // into that single report.
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    /// Requests a report without waiting.
    ///
    /// Returns `false` only if the reporting task has stopped.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Spawns the reporting task, writing each report to stderr.
///
/// The task ends once every [`ReportTrigger`] for `rx` has been dropped.
pub fn spawn_reporter(stats: Arc<Statistics>, rx: mpsc::Receiver<()>) -> JoinHandle<()> {
    spawn_reporter_with(stats, rx, std::io::stderr)
}

/// Spawns the reporting task with a custom sink factory. `sink` is invoked
/// once per report.
pub fn spawn_reporter_with<W, F>(
    stats: Arc<Statistics>,
    mut rx: mpsc::Receiver<()>,
    sink: F,
) -> JoinHandle<()>
where
    W: Write + Send,
    F: Fn() -> W + Send + 'static,
{
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Lock is released before writing.
            let snapshot = stats.snapshot();
            let mut out = sink();
            if let Err(e) = write!(out, "{snapshot}").and_then(|()| out.flush()) {
                tracing::warn!(error = %e, "Failed to write statistics report");
            }
        }
        tracing::debug!("Statistics reporter stopped");
    })
}
