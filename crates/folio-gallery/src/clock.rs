//! Time and randomness collaborators used when minting records.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

/// Source of id suffixes.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

/// Random lowercase base-36 tokens.
#[derive(Clone, Copy, Debug)]
pub struct RandomTokens {
    len: usize,
}

impl RandomTokens {
    /// Length of the suffix on generated ids.
    pub const DEFAULT_LEN: usize = 9;

    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomTokens {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEN)
    }
}

impl TokenSource for RandomTokens {
    fn token(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.len)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}

/// Deterministic tokens: a counter rendered in base 36, zero-padded to nine
/// characters (`000000001`, `000000002`, ...).
#[derive(Debug, Default)]
pub struct SequenceTokens {
    next: AtomicU64,
}

impl SequenceTokens {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSource for SequenceTokens {
    fn token(&self) -> String {
        let mut n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let mut digits = Vec::new();
        while n > 0 {
            digits.push(BASE36[(n % 36) as usize]);
            n /= 36;
        }
        while digits.len() < RandomTokens::DEFAULT_LEN {
            digits.push(b'0');
        }
        digits.iter().rev().map(|&b| b as char).collect()
    }
}
