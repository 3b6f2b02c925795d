//! Rotating check-in tokens with a one-interval grace period.
//!
//! Rotation is lazy: whoever reads the rotator after the interval has elapsed
//! performs the rotation. Any number of missed intervals collapse into a
//! single rotation, so `previous` is always the token the caller could last
//! have seen.

use chrono::{Duration, NaiveDateTime};
use rand::{RngCore, rngs::OsRng};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub const DEFAULT_ROTATION_SECONDS: u64 = 15;
pub const DEFAULT_TOKEN_BYTES: usize = 8;
const MIN_TOKEN_BYTES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    pub interval_seconds: u64,
    /// Random bytes per token, before hex encoding.
    pub token_bytes: usize,
}

impl RotationConfig {
    /// Builds a config, clamping the interval to at least one second and the
    /// token to at least eight bytes of entropy.
    pub fn new(interval_seconds: u64, token_bytes: usize) -> Self {
        Self {
            interval_seconds: interval_seconds.max(1),
            token_bytes: token_bytes.max(MIN_TOKEN_BYTES),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::seconds(i64::try_from(self.interval_seconds).unwrap_or(i64::MAX / 1000))
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_SECONDS, DEFAULT_TOKEN_BYTES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub issued_at: NaiveDateTime,
}

impl Token {
    fn generate(bytes: usize, issued_at: NaiveDateTime) -> Self {
        let mut buf = vec![0u8; bytes];
        OsRng.fill_bytes(&mut buf);
        Self {
            value: hex::encode(buf),
            issued_at,
        }
    }
}

/// The displayed token together with the moment it will be replaced, read
/// under one lock so the pair always belongs together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSnapshot {
    pub token: Token,
    pub next_rotation_at: NaiveDateTime,
}

#[derive(Debug)]
struct RotationState {
    current: Token,
    previous: Option<Token>,
    last_rotation: NaiveDateTime,
}

/// Owns the (current, previous, last rotation) triple behind one mutex.
#[derive(Debug)]
pub struct TokenRotator {
    config: RotationConfig,
    state: Mutex<RotationState>,
}

impl TokenRotator {
    /// Issues the first token at `now`. No previous token exists yet.
    pub fn new(config: RotationConfig, now: NaiveDateTime) -> Self {
        Self {
            config,
            state: Mutex::new(RotationState {
                current: Token::generate(config.token_bytes, now),
                previous: None,
                last_rotation: now,
            }),
        }
    }

    pub fn config(&self) -> RotationConfig {
        self.config
    }

    /// Returns the token to embed in the QR code, rotating first if the interval elapsed.
    pub fn current_token(&self, now: NaiveDateTime) -> Token {
        let mut state = self.lock();
        self.rotate_if_due(&mut state, now);
        state.current.clone()
    }

    /// True iff `token` is the current token or the one it replaced.
    pub fn is_valid(&self, token: Option<&str>, now: NaiveDateTime) -> bool {
        let mut state = self.lock();
        self.rotate_if_due(&mut state, now);

        let Some(token) = token else {
            return false;
        };
        state.current.value == token
            || state
                .previous
                .as_ref()
                .is_some_and(|previous| previous.value == token)
    }

    /// Earliest moment the current token will be replaced.
    pub fn next_rotation_at(&self, now: NaiveDateTime) -> NaiveDateTime {
        let mut state = self.lock();
        self.rotate_if_due(&mut state, now);
        state.last_rotation + self.config.interval()
    }

    /// Current token and next rotation time from a single rotation decision.
    pub fn snapshot(&self, now: NaiveDateTime) -> RotationSnapshot {
        let mut state = self.lock();
        self.rotate_if_due(&mut state, now);
        RotationSnapshot {
            token: state.current.clone(),
            next_rotation_at: state.last_rotation + self.config.interval(),
        }
    }

    fn rotate_if_due(&self, state: &mut RotationState, now: NaiveDateTime) {
        if now - state.last_rotation < self.config.interval() {
            return;
        }
        let fresh = Token::generate(self.config.token_bytes, now);
        state.previous = Some(std::mem::replace(&mut state.current, fresh));
        state.last_rotation = now;
        debug!(at = %now, "Rotated check-in token");
    }

    fn lock(&self) -> MutexGuard<'_, RotationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
