//! Bounded two-level polling.
//!
//! An *attempt* polls a probe up to `max_polls` times, `poll_interval` apart,
//! until the readiness predicate holds. An attempt ends early when the probe
//! reports the resource as absent. Between attempts the poller sleeps
//! `absence_backoff`; after `max_attempts` attempts it gives up with
//! [`WaitState::TimedOut`]. Errors other than absence propagate immediately.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Polling bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Delay between status checks within one attempt
    pub poll_interval: Duration,
    /// Status checks per attempt
    pub max_polls: u32,
    /// Delay before starting another attempt
    pub absence_backoff: Duration,
    /// Attempts before giving up
    pub max_attempts: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            max_polls: 60,
            absence_backoff: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

/// States of the availability wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitState {
    Polling,
    Available,
    TransientAbsent,
    TimedOut,
}

/// Outcome of [`poll_until`]
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport<T> {
    /// `Available` or `TimedOut`
    pub state: WaitState,
    /// Attempts started
    pub attempts: u32,
    /// Probe invocations across all attempts
    pub polls: u32,
    /// Last value the probe returned, if any
    pub last: Option<T>,
}

impl<T> PollReport<T> {
    pub fn is_ready(&self) -> bool {
        self.state == WaitState::Available
    }
}

/// Poll `probe` until `is_ready` holds or the policy is exhausted
pub async fn poll_until<T, F, Fut, P>(
    policy: &WaitPolicy,
    label: &str,
    mut probe: F,
    is_ready: P,
) -> Result<PollReport<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let mut state = WaitState::Polling;
    let mut attempts = 0;
    let mut polls = 0;
    let mut last = None;

    loop {
        match state {
            WaitState::Polling => {
                attempts += 1;
                state = WaitState::TimedOut;

                for poll in 1..=policy.max_polls {
                    polls += 1;
                    match probe().await {
                        Ok(value) => {
                            let ready = is_ready(&value);
                            last = Some(value);
                            if ready {
                                state = WaitState::Available;
                                break;
                            }
                        }
                        Err(err) if err.is_transient_absence() => {
                            tracing::info!(
                                instance = label,
                                attempt = attempts,
                                "Not resolvable right now, treating as transient: {}",
                                err
                            );
                            state = WaitState::TransientAbsent;
                            break;
                        }
                        Err(err) => return Err(err),
                    }

                    if poll < policy.max_polls {
                        tracing::debug!(
                            instance = label,
                            attempt = attempts,
                            poll,
                            "Not ready yet, checking again in {:?}",
                            policy.poll_interval
                        );
                        tokio::time::sleep(policy.poll_interval).await;
                    }
                }

                if state == WaitState::TimedOut && attempts < policy.max_attempts {
                    tracing::warn!(
                        instance = label,
                        attempt = attempts,
                        "Still not ready after {} checks, starting another attempt",
                        policy.max_polls
                    );
                    state = WaitState::TransientAbsent;
                }
            }
            WaitState::TransientAbsent => {
                if attempts >= policy.max_attempts {
                    state = WaitState::TimedOut;
                    continue;
                }
                tokio::time::sleep(policy.absence_backoff).await;
                state = WaitState::Polling;
            }
            WaitState::Available | WaitState::TimedOut => {
                return Ok(PollReport {
                    state,
                    attempts,
                    polls,
                    last,
                });
            }
        }
    }
}
