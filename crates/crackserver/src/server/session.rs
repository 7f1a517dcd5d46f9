//! Per-connection request loop.
//!
//! A session reads one line, answers it with exactly one line, and repeats
//! until the peer closes the connection. Requests on one connection are
//! handled strictly in arrival order; a crack job blocks its own session (and
//! only that session) until every worker has joined.
//!
//! Validation failures are answered with `:invalid` and never end the
//! session. Only end-of-stream or an I/O error does.

use crackserver_core::{
    Command, CrackJob, CrackOutcome, Dictionary, Reply, Request, Statistics, crypt,
};
use std::sync::Arc;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, info, warn};

/// Longest request line read in one piece. Longer input is split into
/// several command attempts.
pub const MAX_LINE_BYTES: usize = 512;

/// Serves sessions against a shared dictionary and statistics set.
///
/// Cloning is cheap; the accept loop hands one clone to every session task.
#[derive(Debug, Clone)]
pub struct SessionHandler {
    dictionary: Arc<Dictionary>,
    stats: Arc<Statistics>,
}

impl SessionHandler {
    pub const fn new(dictionary: Arc<Dictionary>, stats: Arc<Statistics>) -> Self {
        Self { dictionary, stats }
    }

    pub fn stats(&self) -> &Arc<Statistics> {
        &self.stats
    }

    /// Runs the request loop until end-of-stream or an I/O error, then
    /// shuts down the write half and records the disconnect.
    #[tracing::instrument(name = "session", skip_all, fields(peer = %peer))]
    pub async fn handle<R, W>(&self, reader: R, mut writer: W, peer: &str)
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.stats.client_connected();
        info!("Session started");

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::with_capacity(MAX_LINE_BYTES);

        loop {
            buf.clear();
            match (&mut reader)
                .take(MAX_LINE_BYTES as u64)
                .read_until(b'\n', &mut buf)
                .await
            {
                Ok(0) => {
                    info!("Connection closed by peer");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Read error, closing connection");
                    break;
                }
            }

            let line = String::from_utf8_lossy(&buf);
            let reply = self.dispatch(&line).await;

            let mut out = reply.to_string();
            out.push('\n');
            if let Err(e) = write_line(&mut writer, &out).await {
                warn!(error = %e, "Write error, closing connection");
                break;
            }
        }

        if let Err(e) = writer.shutdown().await {
            debug!(error = %e, "Failed to shut down write half");
        }
        self.stats.client_disconnected();
        info!("Session ended");
    }

    /// Validates one request line and computes its reply.
    pub async fn dispatch(&self, line: &str) -> Reply {
        match Request::parse(line) {
            Ok(Request::Crypt { word, salt }) => {
                self.stats.crypt_requested();
                self.crypt(&word, &salt)
            }
            Ok(Request::Crack { hash, threads }) => {
                self.stats.crack_requested();
                self.crack(hash, threads).await
            }
            Err(rejected) => {
                match rejected.command {
                    Some(Command::Crack) => self.stats.crack_requested(),
                    Some(Command::Crypt) => self.stats.crypt_requested(),
                    None => {}
                }
                debug!(line = %line.trim_end(), reason = %rejected, "Invalid request");
                Reply::Invalid
            }
        }
    }

    fn crypt(&self, word: &str, salt: &str) -> Reply {
        match crypt::hash(word, salt) {
            Ok(hash) => {
                self.stats.hash_computed();
                Reply::Hash(hash)
            }
            Err(e) => {
                warn!(error = %e, "Crypt failed");
                Reply::Invalid
            }
        }
    }

    async fn crack(&self, hash: String, threads: usize) -> Reply {
        let job = match CrackJob::new(
            hash,
            threads,
            Arc::clone(&self.dictionary),
            Arc::clone(&self.stats),
        ) {
            Ok(job) => job,
            Err(e) => {
                warn!(error = %e, "Rejected crack job");
                return Reply::Invalid;
            }
        };

        match job.run().await {
            Ok(CrackOutcome::Found(word)) => Reply::Word(word),
            Ok(CrackOutcome::Exhausted) => Reply::Failed,
            Err(e) => {
                warn!(error = %e, "Crack job failed");
                Reply::Failed
            }
        }
    }
}

async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
