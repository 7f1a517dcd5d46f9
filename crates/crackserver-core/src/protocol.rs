//! Line protocol shared by the server and its clients.
//!
//! Every request and every reply is exactly one newline-terminated line:
//!
//! ```text
//! crypt <word 1-8 chars> <salt 3 chars>   ->  <13-char hash> | :invalid
//! crack <13-char hash> [threads 1-50]     ->  <word> | :failed | :invalid
//! ```

use crate::crack::MAX_THREADS;
use crate::crypt::{HASH_LEN, MAX_WORD_LEN, SALT_LEN, is_salt_char};
use core::fmt;

/// Reply sent for malformed or semantically invalid requests.
pub const INVALID: &str = ":invalid";

/// Reply sent when a crack job exhausts the dictionary.
pub const FAILED: &str = ":failed";

/// Exact salt length accepted by `crypt` requests.
pub const CRYPT_SALT_LEN: usize = 3;

/// Maximum number of digits accepted in a thread count.
pub const MAX_THREAD_DIGITS: usize = 6;

/// The two job kinds the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Crack,
    Crypt,
}

impl Command {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "crack" => Some(Self::Crack),
            "crypt" => Some(Self::Crypt),
            _ => None,
        }
    }
}

/// A validated request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Crypt { word: String, salt: String },
    Crack { hash: String, threads: usize },
}

impl Request {
    pub const fn command(&self) -> Command {
        match self {
            Self::Crypt { .. } => Command::Crypt,
            Self::Crack { .. } => Command::Crack,
        }
    }

    /// Tokenizes and validates one request line.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] for any line that must be answered with
    /// [`INVALID`]. The rejection still names the command when the keyword
    /// and field count were acceptable, so it can be counted.
    pub fn parse(line: &str) -> Result<Self, Rejected> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (keyword, args) = match fields.as_slice() {
            [keyword, args @ ..] if (1..=2).contains(&args.len()) => (*keyword, args),
            _ => return Err(Rejected::malformed("expected a command and 1 or 2 arguments")),
        };
        let command = Command::from_keyword(keyword)
            .ok_or_else(|| Rejected::malformed("unknown command"))?;
        let reject = |reason| Rejected {
            command: Some(command),
            reason,
        };

        match (command, args) {
            (Command::Crypt, [word, salt]) => {
                if word.is_empty() || word.len() > MAX_WORD_LEN {
                    return Err(reject("word must be 1 to 8 characters"));
                }
                if salt.chars().count() != CRYPT_SALT_LEN || !salt.chars().all(is_salt_char) {
                    return Err(reject("salt must be 3 characters from [A-Za-z0-9./]"));
                }
                Ok(Self::Crypt {
                    word: (*word).to_owned(),
                    salt: (*salt).to_owned(),
                })
            }
            (Command::Crypt, _) => Err(reject("crypt takes exactly 2 arguments")),
            (Command::Crack, [hash, rest @ ..]) => {
                if hash.chars().count() != HASH_LEN
                    || !hash.chars().take(SALT_LEN).all(is_salt_char)
                {
                    return Err(reject("hash must be 13 characters starting with a salt"));
                }
                let threads = match rest {
                    [] => 1,
                    [count] => parse_thread_count(count)
                        .ok_or_else(|| reject("thread count must be 1 to 50"))?,
                    _ => return Err(reject("crack takes 1 or 2 arguments")),
                };
                Ok(Self::Crack {
                    hash: (*hash).to_owned(),
                    threads,
                })
            }
            (Command::Crack, []) => Err(reject("crack takes 1 or 2 arguments")),
        }
    }
}

fn parse_thread_count(count: &str) -> Option<usize> {
    if count.is_empty()
        || count.len() > MAX_THREAD_DIGITS
        || !count.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    count
        .parse()
        .ok()
        .filter(|n| (1..=MAX_THREADS).contains(n))
}

/// Why a request line was answered with [`INVALID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected {
    /// The recognised command, if the keyword and field count were valid.
    pub command: Option<Command>,
    pub reason: &'static str,
}

impl Rejected {
    const fn malformed(reason: &'static str) -> Self {
        Self {
            command: None,
            reason,
        }
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason)
    }
}

/// A single reply line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Result of a `crypt` request.
    Hash(String),
    /// Result of a successful `crack` request.
    Word(String),
    Failed,
    Invalid,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(s) | Self::Word(s) => f.write_str(s),
            Self::Failed => f.write_str(FAILED),
            Self::Invalid => f.write_str(INVALID),
        }
    }
}
