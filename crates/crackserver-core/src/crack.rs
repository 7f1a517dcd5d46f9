//! Multi-worker dictionary search for a crypt hash.
//!
//! A [`CrackJob`] fans a single `crack` request out over exactly
//! `thread_count` blocking workers. Each worker registers with the job's
//! [`Partition`] to receive a contiguous slice of the dictionary, hashes every
//! word in that slice with the target's salt, and stops as soon as any worker
//! has found the match.
//!
//! ## Shared state
//!
//! Each job owns a fresh pair of shared values, discarded when the job ends:
//!
//! - the partition cursor and registration counter, behind one
//!   [`parking_lot::Mutex`] held only while a worker claims its range;
//! - the `found` flag, an [`AtomicBool`] that only moves from `false` to
//!   `true`. Workers poll it without locking before every hash; a stale read
//!   costs at most one extra hash.
//!
//! The first worker to flip `found` owns the result. A later match (only
//! possible with duplicate dictionary entries) is discarded.

use crate::{Dictionary, Error, Result, Statistics, crypt};
use core::{
    ops::Range,
    sync::atomic::{AtomicBool, Ordering},
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Largest thread count a client may request for one job.
pub const MAX_THREADS: usize = 50;

/// Result of a completed crack job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackOutcome {
    /// A dictionary word hashes to the target.
    Found(String),
    /// Every word was tried without a match.
    Exhausted,
}

/// Hands out contiguous dictionary ranges to workers as they register.
///
/// Every worker but the last receives `floor(num_words / thread_count)`
/// indices starting at the current cursor. The worker whose registration
/// brings the counter to `thread_count` also takes the remainder, so the
/// claimed ranges cover `[0, num_words)` exactly, whatever order the workers
/// register in.
#[derive(Debug)]
pub struct Partition {
    num_words: usize,
    thread_count: usize,
    slice: usize,
    cursor: usize,
    initiated: usize,
}

impl Partition {
    pub fn new(num_words: usize, thread_count: usize) -> Self {
        let thread_count = thread_count.max(1);
        Self {
            num_words,
            thread_count,
            slice: num_words / thread_count,
            cursor: 0,
            initiated: 0,
        }
    }

    /// Registers one worker and returns the range it must search.
    pub fn claim(&mut self) -> Range<usize> {
        let start = self.cursor;
        self.cursor += self.slice;
        self.initiated += 1;

        let end = if self.initiated == self.thread_count {
            self.num_words
        } else {
            start + self.slice
        };
        start.min(self.num_words)..end.min(self.num_words)
    }

    /// Number of workers registered so far.
    pub const fn initiated(&self) -> usize {
        self.initiated
    }
}

/// One `crack` request: a target hash searched for across the dictionary.
pub struct CrackJob {
    target: String,
    salt: String,
    thread_count: usize,
    dictionary: Arc<Dictionary>,
    stats: Arc<Statistics>,
    partition: Mutex<Partition>,
    found: AtomicBool,
}

impl CrackJob {
    /// Prepares a job for `target`, using its first two characters as the
    /// salt. A `thread_count` of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Crypt`] if `target` is too short to carry a salt.
    pub fn new(
        target: impl Into<String>,
        thread_count: usize,
        dictionary: Arc<Dictionary>,
        stats: Arc<Statistics>,
    ) -> Result<Self> {
        let target = target.into();
        let salt = crypt::salt_of(&target)
            .ok_or_else(|| Error::Crypt {
                reason: format!("hash {target:?} carries no salt"),
            })?
            .to_owned();
        let thread_count = thread_count.max(1);

        Ok(Self {
            partition: Mutex::new(Partition::new(dictionary.len(), thread_count)),
            found: AtomicBool::new(false),
            target,
            salt,
            thread_count,
            dictionary,
            stats,
        })
    }

    /// Runs all workers to completion and returns the lowest-indexed worker's
    /// match, or [`CrackOutcome::Exhausted`].
    ///
    /// The outcome is recorded in [`Statistics`] as a successful or failed
    /// crack request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Worker`] if a worker panicked and no other worker
    /// found the word.
    #[tracing::instrument(
        skip_all,
        fields(threads = self.thread_count, words = self.dictionary.len())
    )]
    pub async fn run(self) -> Result<CrackOutcome> {
        let job = Arc::new(self);

        let handles: Vec<_> = (0..job.thread_count)
            .map(|index| {
                let job = Arc::clone(&job);
                tokio::task::spawn_blocking(move || job.search(index))
            })
            .collect();

        let results = futures::future::join_all(handles).await;

        let mut failure = None;
        let mut found = None;
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(Some(word)) => {
                    found = Some(word);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(worker = index, error = %e, "Crack worker failed");
                    failure.get_or_insert(Error::Worker {
                        index,
                        context: e.to_string(),
                    });
                }
            }
        }

        match (found, failure) {
            (Some(word), _) => {
                job.stats.crack_succeeded();
                tracing::debug!(word = %word, "Hash cracked");
                Ok(CrackOutcome::Found(word))
            }
            (None, Some(e)) => {
                job.stats.crack_failed();
                Err(e)
            }
            (None, None) => {
                job.stats.crack_failed();
                tracing::debug!("Dictionary exhausted");
                Ok(CrackOutcome::Exhausted)
            }
        }
    }

    fn search(&self, worker: usize) -> Option<String> {
        let range = self.partition.lock().claim();
        tracing::trace!(worker, start = range.start, end = range.end, "Worker registered");

        let words = self.dictionary.words().get(range).unwrap_or_default();
        for word in words {
            if self.found.load(Ordering::Acquire) {
                tracing::trace!(worker, "Stopping, match found elsewhere");
                return None;
            }

            let hashed = match crypt::hash(word, &self.salt) {
                Ok(hashed) => hashed,
                Err(e) => {
                    tracing::warn!(worker, word = %word, error = %e, "Skipping unhashable word");
                    continue;
                }
            };
            self.stats.hash_computed();

            if hashed == self.target {
                return self
                    .found
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                    .then(|| word.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Arc<Dictionary> {
        Arc::new(Dictionary::from_words([
            "cat", "dog", "bird", "fish", "horse", "mouse", "snake", "otter", "lynx", "wolf",
            "bear",
        ]))
    }

    fn hash_of(word: &str) -> String {
        crypt::hash(word, "ab").unwrap()
    }

    async fn crack(
        target: &str,
        threads: usize,
        dict: Arc<Dictionary>,
    ) -> (CrackOutcome, Arc<Statistics>) {
        let stats = Arc::new(Statistics::new());
        let outcome = CrackJob::new(target, threads, dict, Arc::clone(&stats))
            .unwrap()
            .run()
            .await
            .unwrap();
        (outcome, stats)
    }

    #[test]
    fn partition_covers_every_index_exactly_once() {
        for num_words in 0..120 {
            for threads in 1..=MAX_THREADS {
                let mut partition = Partition::new(num_words, threads);
                let mut seen = vec![0_u8; num_words];
                for _ in 0..threads {
                    for i in partition.claim() {
                        seen[i] += 1;
                    }
                }
                assert_eq!(partition.initiated(), threads);
                assert!(
                    seen.iter().all(|&n| n == 1),
                    "num_words={num_words} threads={threads} seen={seen:?}"
                );
            }
        }
    }

    #[test]
    fn partition_gives_remainder_to_last_worker() {
        let mut partition = Partition::new(10, 3);
        assert_eq!(partition.claim(), 0..3);
        assert_eq!(partition.claim(), 3..6);
        assert_eq!(partition.claim(), 6..10);
    }

    #[test]
    fn partition_with_more_threads_than_words() {
        let mut partition = Partition::new(2, 5);
        let ranges: Vec<_> = (0..5).map(|_| partition.claim()).collect();
        assert_eq!(ranges, [0..0, 0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn job_requires_a_salt() {
        let stats = Arc::new(Statistics::new());
        assert!(CrackJob::new("a", 1, words(), stats).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn finds_word_with_any_thread_count() {
        let dict = words();
        for threads in [1, 2, 3, 7, 11, 50] {
            let (outcome, stats) = crack(&hash_of("otter"), threads, Arc::clone(&dict)).await;
            assert_eq!(outcome, CrackOutcome::Found("otter".into()), "threads={threads}");
            assert_eq!(stats.snapshot().successful_cracks, 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn absent_word_hashes_every_entry_once() {
        let dict = words();
        let target = hash_of("zebra");
        for threads in 1..=MAX_THREADS {
            let (outcome, stats) = crack(&target, threads, Arc::clone(&dict)).await;
            assert_eq!(outcome, CrackOutcome::Exhausted);

            let snap = stats.snapshot();
            assert_eq!(snap.hash_computations, dict.len() as u64, "threads={threads}");
            assert_eq!(snap.failed_cracks, 1);
            assert_eq!(snap.successful_cracks, 0);
        }
    }

    #[tokio::test]
    async fn single_worker_stops_at_the_match() {
        let dict = words();
        let (outcome, stats) = crack(&hash_of("dog"), 1, dict).await;
        assert_eq!(outcome, CrackOutcome::Found("dog".into()));
        assert_eq!(stats.snapshot().hash_computations, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn other_workers_stop_once_the_word_is_found() {
        const WORDS: usize = 8000;
        let dict = Arc::new(Dictionary::from_words(
            (0..WORDS).map(|i| format!("w{i:07}")),
        ));
        let target = hash_of("w0000000");

        let (outcome, stats) = crack(&target, 2, dict).await;
        assert_eq!(outcome, CrackOutcome::Found("w0000000".into()));

        // Worker 1 owns the second half; scanning all of it means it never
        // saw the match.
        let hashed = stats.snapshot().hash_computations;
        assert!(hashed < (WORDS / 2) as u64, "hashed {hashed} of {WORDS}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn duplicate_entries_yield_one_result() {
        let dict = Arc::new(Dictionary::from_words(["dup", "x", "y", "dup"]));
        let (outcome, _) = crack(&hash_of("dup"), 2, dict).await;
        assert_eq!(outcome, CrackOutcome::Found("dup".into()));
    }

    #[tokio::test]
    async fn salt_comes_from_target() {
        let dict = words();
        let target = crypt::hash("bear", "Q/").unwrap();
        let (outcome, _) = crack(&target, 4, dict).await;
        assert_eq!(outcome, CrackOutcome::Found("bear".into()));
    }
}
