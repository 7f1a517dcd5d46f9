use crate::{Error, Result, crypt::MAX_WORD_LEN};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// An immutable, ordered list of candidate plaintext words.
///
/// Built once at startup and shared read-only (typically behind an
/// [`Arc`](std::sync::Arc)) by every session and crack worker. No locking is
/// needed to read it.
///
/// Words longer than [`MAX_WORD_LEN`] bytes are dropped while building, since
/// crypt would never see past that length anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// Reads a newline-delimited word list from `path`.
    ///
    /// Line terminators (`\n` or `\r\n`) are trimmed. Entries longer than
    /// [`MAX_WORD_LEN`] bytes and lines that are not valid UTF-8 are skipped;
    /// everything else keeps its input order.
    ///
    /// # Errors
    ///
    /// - [`Error::DictionaryOpen`] if the file cannot be opened or read.
    /// - [`Error::DictionaryEmpty`] if no usable word remains.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source| Error::DictionaryOpen {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = BufReader::new(File::open(path).map_err(open_error)?);
        let mut words = Vec::new();
        let mut line = Vec::new();
        let mut skipped = 0_usize;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).map_err(open_error)? == 0 {
                break;
            }
            let raw = trim_terminator(&line);
            match core::str::from_utf8(raw) {
                Ok(word) if word.len() <= MAX_WORD_LEN => words.push(word.to_owned()),
                _ => skipped += 1,
            }
        }

        if words.is_empty() {
            return Err(Error::DictionaryEmpty {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            words = words.len(),
            skipped,
            "Dictionary loaded"
        );
        Ok(Self { words })
    }

    /// Builds a dictionary from in-memory words, applying the same length
    /// filter as [`Dictionary::load`].
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|w: &String| w.len() <= MAX_WORD_LEN)
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
