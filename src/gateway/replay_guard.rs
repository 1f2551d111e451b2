//! Redelivery suppression for platform webhooks.
//!
//! A redelivered event keeps its platform event id (`webhookEventId` on LINE,
//! `update_id` on Telegram) while the rest of the body may change, so events
//! are keyed by id. Keys are remembered by SHA-256 digest for a fixed window,
//! evicted oldest first, in memory only.

use sha2::{Digest, Sha256};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_WINDOW_SECS: u64 = 300;
const DEFAULT_CAPACITY: usize = 10_000;

type KeyDigest = [u8; 32];

#[derive(Default)]
struct Seen {
    digests: HashSet<KeyDigest>,
    order: VecDeque<(KeyDigest, Instant)>,
}

pub struct ReplayGuard {
    seen: Mutex<Seen>,
    window: Duration,
    capacity: usize,
}

impl ReplayGuard {
    pub fn new() -> Self {
        Self::with_limits(Duration::from_secs(DEFAULT_WINDOW_SECS), DEFAULT_CAPACITY)
    }

    pub fn with_limits(window: Duration, capacity: usize) -> Self {
        Self {
            seen: Mutex::new(Seen::default()),
            window,
            capacity: capacity.max(1),
        }
    }

    /// `true` the first time `key` is seen inside the window.
    pub fn check_and_record(&self, key: &str) -> bool {
        let digest: KeyDigest = Sha256::digest(key.as_bytes()).into();
        let now = Instant::now();
        let mut seen = self
            .seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        while let Some((oldest, at)) = seen.order.front().copied() {
            if now.duration_since(at) < self.window && seen.order.len() < self.capacity {
                break;
            }
            seen.order.pop_front();
            seen.digests.remove(&oldest);
        }

        if !seen.digests.insert(digest) {
            return false;
        }
        seen.order.push_back((digest, now));
        true
    }

    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReplayGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayGuard")
            .field("window", &self.window)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
