//! Error types for the crack service.
//!
//! This module defines the central `Error` enum, which captures the startup and
//! job failures of the service. Per-request validation failures are not errors
//! at this level: they are answered with a sentinel reply (see
//! [`Reply`](crate::Reply)) and never leave the session.
//!
//! ## Error Cases
//! - `DictionaryOpen`: The dictionary file could not be opened or read.
//! - `DictionaryEmpty`: No usable words remained after filtering.
//! - `Crypt`: The hashing backend rejected its input.
//! - `Worker`: A crack worker terminated abnormally.
//! - `Bind`: The listening socket could not be opened.

use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the crack service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The dictionary file could not be opened or read.
    #[error("unable to open dictionary file \"{}\"", path.display())]
    DictionaryOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every line of the dictionary was filtered out.
    #[error("no plain text words to test in \"{}\"", path.display())]
    DictionaryEmpty { path: PathBuf },

    /// The crypt backend refused the word or salt.
    #[error("crypt error: {reason}")]
    Crypt { reason: String },

    /// A crack worker panicked or was cancelled before reporting.
    #[error("worker {index} failed: {context}")]
    Worker { index: usize, context: String },

    /// The listening socket could not be bound.
    #[error("unable to open socket for listening on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
