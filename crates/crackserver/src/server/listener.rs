//! Listening socket and accept loop.

use crate::server::{admission::Admission, session::SessionHandler};
use core::{future::Future, time::Duration};
use crackserver_core::{Error, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound listener plus everything a session needs.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    admission: Admission,
    sessions: SessionHandler,
}

impl Server {
    /// Binds `addr` and starts listening.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] if the socket cannot be bound or its local
    /// address cannot be read back.
    pub async fn bind(addr: &str, admission: Admission, sessions: SessionHandler) -> Result<Self> {
        let bind_err = |source| Error::Bind {
            addr: addr.to_owned(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        Ok(Self {
            listener,
            local_addr,
            admission,
            sessions,
        })
    }

    /// The address actually bound, with the OS-chosen port filled in.
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// An admission permit is taken before each `accept`, so once the limit is
    /// reached new clients queue in the listen backlog. Sessions already
    /// running are left to finish on their own.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(addr = %self.local_addr, "Accepting connections");

        loop {
            let permit = tokio::select! {
                biased;
                () = &mut shutdown => break,
                permit = self.admission.acquire() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let (stream, peer) = tokio::select! {
                biased;
                () = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                },
            };

            if let Err(e) = stream.set_nodelay(true) {
                debug!(error = %e, "Failed to set TCP_NODELAY");
            }

            let sessions = self.sessions.clone();
            tokio::spawn(async move {
                let _permit = permit;
                let (reader, writer) = stream.into_split();
                sessions.handle(reader, writer, &peer.to_string()).await;
            });
        }

        self.admission.close();
        info!("Stopped accepting connections");
    }
}
