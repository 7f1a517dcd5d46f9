//! Core building blocks of the crack service.
//!
//! - [`Dictionary`]: the immutable word list searched by crack jobs.
//! - [`crypt`]: traditional DES-based Unix crypt hashing.
//! - [`CrackJob`]: partitions the dictionary across worker threads and stops
//!   on the first match.
//! - [`Statistics`]: lock-guarded counters and the signal-driven reporter.
//! - [`Request`] / [`Reply`]: the one-line text protocol.
//!
//! The TCP server itself lives in the `crackserver` crate.

pub mod crypt;

mod crack;
mod dictionary;
mod error;
mod protocol;
mod stats;

pub use crate::crack::*;
pub use crate::dictionary::*;
pub use crate::error::*;
pub use crate::protocol::*;
pub use crate::stats::*;
