//! Completion latch for the shutdown handshake
//!
//! A count-down latch in the style of the shared-counter tickets used across
//! the worker loops: every worker of a role holds one RAII token; the
//! shutdown observer blocks until the last token of the role is released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// A count-down latch shared by all workers of one role
///
/// The latch starts at the number of tokens handed out; `wait` blocks until
/// every token has been released. Releasing is idempotent per token and also
/// happens on drop, so a worker that fails or panics still signals its
/// completion exactly once.
#[derive(Debug, Clone)]
pub struct CompletionLatch {
    inner: Arc<LatchInner>,
}

#[derive(Debug)]
struct LatchInner {
    remaining: Mutex<usize>,
    all_done: Condvar,
}

/// RAII completion token held by one worker
///
/// Dropping the token (even during a panic unwind) counts the worker as
/// complete; calling [`CompletionToken::complete`] first makes the signal
/// explicit and the drop a no-op.
#[derive(Debug)]
pub struct CompletionToken {
    latch: CompletionLatch,
    released: AtomicBool,
}

impl CompletionLatch {
    /// Create a latch expecting `count` tokens and hand the tokens out
    pub fn new(count: usize) -> (Self, Vec<CompletionToken>) {
        let latch = Self {
            inner: Arc::new(LatchInner {
                remaining: Mutex::new(count),
                all_done: Condvar::new(),
            }),
        };
        let tokens = (0..count)
            .map(|_| CompletionToken {
                latch: latch.clone(),
                released: AtomicBool::new(false),
            })
            .collect();
        (latch, tokens)
    }

    /// Block until every token has been released
    pub fn wait(&self) {
        let mut remaining = self.lock_remaining();
        while *remaining > 0 {
            remaining = self
                .inner
                .all_done
                .wait(remaining)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Block until every token has been released or the timeout elapses
    ///
    /// Returns true if the latch opened within the timeout. Used by tests to
    /// turn a shutdown deadlock into a failure instead of a hang.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        let mut remaining = self.lock_remaining();
        while *remaining > 0 {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, result) = self
                .inner
                .all_done
                .wait_timeout(remaining, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            remaining = guard;
            if result.timed_out() && *remaining > 0 {
                return false;
            }
        }
        true
    }

    /// Number of tokens not yet released (instantaneous)
    pub fn pending(&self) -> usize {
        *self.lock_remaining()
    }

    fn count_down(&self) {
        let mut remaining = self.lock_remaining();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.inner.all_done.notify_all();
        }
    }

    fn lock_remaining(&self) -> std::sync::MutexGuard<'_, usize> {
        self.inner
            .remaining
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CompletionToken {
    /// Signal completion; idempotent
    pub fn complete(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.latch.count_down();
        }
    }
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        self.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_latch_opens_when_all_tokens_complete() {
        let (latch, tokens) = CompletionLatch::new(3);
        assert_eq!(latch.pending(), 3);
        for token in &tokens {
            token.complete();
        }
        assert_eq!(latch.pending(), 0);
        latch.wait();
    }

    #[test]
    fn test_complete_is_idempotent() {
        let (latch, tokens) = CompletionLatch::new(2);
        tokens[0].complete();
        tokens[0].complete();
        tokens[0].complete();
        assert_eq!(latch.pending(), 1);
    }

    #[test]
    fn test_drop_counts_as_completion() {
        let (latch, tokens) = CompletionLatch::new(2);
        drop(tokens);
        assert_eq!(latch.pending(), 0);
        latch.wait();
    }

    #[test]
    fn test_wait_blocks_until_last_token() {
        let (latch, mut tokens) = CompletionLatch::new(2);
        let last = tokens.pop().unwrap();
        tokens.pop().unwrap().complete();

        let waiter = {
            let latch = latch.clone();
            thread::spawn(move || latch.wait())
        };
        // The waiter cannot finish before the last token is released.
        assert_eq!(latch.pending(), 1);
        last.complete();
        waiter.join().unwrap();
    }

    #[test]
    fn test_wait_timeout_reports_stuck_latch() {
        let (latch, _tokens) = CompletionLatch::new(1);
        assert!(!latch.wait_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_wait_timeout_opens_promptly() {
        let (latch, tokens) = CompletionLatch::new(1);
        tokens[0].complete();
        assert!(latch.wait_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_count_latch_is_open() {
        let (latch, tokens) = CompletionLatch::new(0);
        assert!(tokens.is_empty());
        latch.wait();
    }
}
