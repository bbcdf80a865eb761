//! Brute-force login throttle.
//!
//! Each user carries `login_attempts` and `block_expires_at`. The pair moves
//! through three states:
//!
//! | state | condition |
//! |-------|-----------|
//! | [`ThrottleState::Open`] | `attempts <= max_attempts` |
//! | [`ThrottleState::Blocked`] | `attempts > max_attempts` and `now < block_expires_at` |
//! | [`ThrottleState::ExpiredBlock`] | `attempts > max_attempts` and `now >= block_expires_at` |
//!
//! The policy only decides; the login use case persists the outcome.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Failed logins tolerated before the account is blocked.
    pub max_attempts: i32,
    pub block_duration: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            block_duration: Duration::hours(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Open,
    Blocked,
    ExpiredBlock,
}

/// What a failed password check turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    WrongPassword,
    Block { until: DateTime<Utc> },
}

impl ThrottlePolicy {
    pub fn state(
        &self,
        login_attempts: i32,
        block_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ThrottleState {
        if login_attempts <= self.max_attempts {
            ThrottleState::Open
        } else if now < block_expires_at {
            ThrottleState::Blocked
        } else {
            ThrottleState::ExpiredBlock
        }
    }

    /// Decide the outcome of a failure given the already-incremented count.
    pub fn after_failure(&self, login_attempts: i32, now: DateTime<Utc>) -> FailureOutcome {
        if login_attempts > self.max_attempts {
            FailureOutcome::Block {
                until: now + self.block_duration,
            }
        } else {
            FailureOutcome::WrongPassword
        }
    }
}
