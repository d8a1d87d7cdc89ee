// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control-flow policy and wake-up causes.
//!
//! The application picks a [`ControlFlow`] once per pump cycle. The pump
//! adapter turns it into a bounded timeout for the next native call with
//! [`ControlFlow::timeout`] and, after the native call returns, explains the
//! wake-up to the application with a [`StartCause`].

use crate::time::{Duration, Instant, TimeError};

/// How long the next native pump may wait when no event arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ControlFlow {
    /// Return immediately with whatever is available.
    Poll,
    /// Block until the next native event.
    #[default]
    Wait,
    /// Block until the deadline or the next native event, whichever is first.
    WaitUntil(Instant),
}

impl ControlFlow {
    /// Returns `WaitUntil(now + timeout)`.
    pub const fn wait_duration(now: Instant, timeout: Duration) -> Result<Self, TimeError> {
        match now.checked_add(timeout) {
            Ok(deadline) => Ok(Self::WaitUntil(deadline)),
            Err(e) => Err(e),
        }
    }

    /// Returns how long a native pump started at `now` may block.
    ///
    /// `None` means unbounded. A deadline already in the past yields zero.
    #[must_use]
    pub const fn timeout(self, now: Instant) -> Option<Duration> {
        match self {
            Self::Poll => Some(Duration::ZERO),
            Self::Wait => None,
            Self::WaitUntil(deadline) => Some(deadline.saturating_duration_since(now)),
        }
    }

    /// Returns the deadline for [`WaitUntil`](Self::WaitUntil).
    #[must_use]
    pub const fn deadline(self) -> Option<Instant> {
        match self {
            Self::WaitUntil(deadline) => Some(deadline),
            Self::Poll | Self::Wait => None,
        }
    }
}

/// Clips a control-flow timeout to the host's budget.
///
/// Either side may be unbounded (`None`); the result is the tighter bound.
#[must_use]
pub fn clip_timeout(flow_timeout: Option<Duration>, host_budget: Option<Duration>) -> Option<Duration> {
    match (flow_timeout, host_budget) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(t), None) | (None, Some(t)) => Some(t),
        (None, None) => None,
    }
}

/// Why a pump cycle woke up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StartCause {
    /// The first cycle of the event loop.
    Init,
    /// The previous cycle asked for [`ControlFlow::Poll`].
    Poll,
    /// The [`ControlFlow::WaitUntil`] deadline passed without an event
    /// cutting the wait short.
    ResumeTimeReached {
        /// When the wait started.
        start: Instant,
        /// The deadline that was requested.
        requested_resume: Instant,
    },
    /// The wait ended before its deadline.
    ///
    /// `requested_resume` is only present when the prior control flow was
    /// [`ControlFlow::WaitUntil`].
    WaitCancelled {
        /// When the wait started.
        start: Instant,
        /// The deadline that was requested, if any.
        requested_resume: Option<Instant>,
    },
}

impl StartCause {
    /// Classifies a wake-up after a native pump that began at `start` under
    /// `prior` and returned at `now`.
    ///
    /// A [`Wait`](ControlFlow::Wait) that ends without a deadline, whether
    /// from an event or a host-budget timer, is `WaitCancelled` with no
    /// requested resume.
    #[must_use]
    pub fn classify(prior: ControlFlow, start: Instant, now: Instant) -> Self {
        match prior {
            ControlFlow::Poll => Self::Poll,
            ControlFlow::Wait => Self::WaitCancelled {
                start,
                requested_resume: None,
            },
            ControlFlow::WaitUntil(deadline) if now >= deadline => Self::ResumeTimeReached {
                start,
                requested_resume: deadline,
            },
            ControlFlow::WaitUntil(deadline) => Self::WaitCancelled {
                start,
                requested_resume: Some(deadline),
            },
        }
    }

    /// A short label for logs and traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Poll => "Poll",
            Self::ResumeTimeReached { .. } => "ResumeTimeReached",
            Self::WaitCancelled { .. } => "WaitCancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_ms(ms: u64) -> Instant {
        Instant::from_offset(Duration::from_millis(ms))
    }

    #[test]
    fn default_is_wait() {
        assert_eq!(ControlFlow::default(), ControlFlow::Wait);
    }

    #[test]
    fn timeouts_per_variant() {
        let now = at_ms(1_000);
        assert_eq!(ControlFlow::Poll.timeout(now), Some(Duration::ZERO));
        assert_eq!(ControlFlow::Wait.timeout(now), None);
        assert_eq!(
            ControlFlow::WaitUntil(at_ms(1_250)).timeout(now),
            Some(Duration::from_millis(250))
        );
        assert_eq!(
            ControlFlow::WaitUntil(at_ms(900)).timeout(now),
            Some(Duration::ZERO),
            "past deadlines do not wait"
        );
    }

    #[test]
    fn wait_duration_builds_deadline() {
        let flow = ControlFlow::wait_duration(at_ms(10), Duration::from_millis(5)).unwrap();
        assert_eq!(flow, ControlFlow::WaitUntil(at_ms(15)));
        assert_eq!(flow.deadline(), Some(at_ms(15)));
        assert_eq!(
            ControlFlow::wait_duration(at_ms(10), Duration::MAX),
            Err(TimeError::InstantOverflow)
        );
    }

    #[test]
    fn host_budget_clips_timeout() {
        let ms = Duration::from_millis;
        assert_eq!(clip_timeout(None, Some(ms(16))), Some(ms(16)));
        assert_eq!(clip_timeout(Some(ms(40)), Some(ms(16))), Some(ms(16)));
        assert_eq!(clip_timeout(Some(ms(4)), Some(ms(16))), Some(ms(4)));
        assert_eq!(clip_timeout(Some(ms(4)), None), Some(ms(4)));
        assert_eq!(clip_timeout(None, None), None);
    }

    #[test]
    fn classify_wait_until() {
        let start = at_ms(0);
        let deadline = at_ms(100);
        let flow = ControlFlow::WaitUntil(deadline);
        assert_eq!(
            StartCause::classify(flow, start, at_ms(40)),
            StartCause::WaitCancelled {
                start,
                requested_resume: Some(deadline)
            }
        );
        assert_eq!(
            StartCause::classify(flow, start, at_ms(100)),
            StartCause::ResumeTimeReached {
                start,
                requested_resume: deadline
            }
        );
    }

    #[test]
    fn classify_wait_and_poll() {
        let start = at_ms(5);
        assert_eq!(
            StartCause::classify(ControlFlow::Wait, start, at_ms(500)),
            StartCause::WaitCancelled {
                start,
                requested_resume: None
            }
        );
        assert_eq!(
            StartCause::classify(ControlFlow::Poll, start, at_ms(5)),
            StartCause::Poll
        );
    }
}
