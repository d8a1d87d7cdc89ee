// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer futures for suspendable handlers.
//!
//! The pump polls a suspended handler once per call, so a [`Sleep`] simply
//! compares a clock against its deadline on every poll.
//!
//! [`ActiveEventLoop::sleep`] reads the native loop's clock, the same one
//! that times control-flow waits, so it follows a manual test clock. The
//! free [`sleep`] and [`sleep_until`] functions (`std` only) read the process
//! monotonic clock instead. The two clocks are unrelated: with a manual
//! native clock only the loop-bound form stays in step with the loop.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::active::ActiveEventLoop;
use crate::time::{Duration, Instant, TimeError};

#[derive(Clone, Debug)]
enum SleepClock {
    #[cfg(feature = "std")]
    Process,
    Loop(ActiveEventLoop),
}

impl SleepClock {
    fn now(&self) -> Instant {
        match self {
            #[cfg(feature = "std")]
            Self::Process => Instant::now(),
            Self::Loop(el) => el.now(),
        }
    }
}

/// Resolves once its clock reaches a deadline.
#[derive(Clone, Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Sleep {
    deadline: Instant,
    clock: SleepClock,
}

impl Sleep {
    /// The instant this future resolves at.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.now() >= self.deadline {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Sleeps for `duration` from now on the process clock.
#[cfg(feature = "std")]
pub fn sleep(duration: Duration) -> Result<Sleep, TimeError> {
    Ok(sleep_until(Instant::after(duration)?))
}

/// Sleeps until `deadline` on the process clock. A deadline in the past
/// resolves on first poll.
#[cfg(feature = "std")]
pub fn sleep_until(deadline: Instant) -> Sleep {
    Sleep {
        deadline,
        clock: SleepClock::Process,
    }
}

impl ActiveEventLoop {
    /// Sleeps for `duration` on the native loop's clock.
    pub fn sleep(&self, duration: Duration) -> Result<Sleep, TimeError> {
        Ok(self.sleep_until(self.now().checked_add(duration)?))
    }

    /// Sleeps until `deadline` on the native loop's clock.
    pub fn sleep_until(&self, deadline: Instant) -> Sleep {
        Sleep {
            deadline,
            clock: SleepClock::Loop(self.clone()),
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use core::task::Waker;

    use super::*;

    fn poll_once(sleep: &mut Sleep) -> Poll<()> {
        let mut cx = Context::from_waker(Waker::noop());
        Pin::new(sleep).poll(&mut cx)
    }

    #[test]
    fn zero_sleep_is_ready() {
        let mut sleep = sleep(Duration::ZERO).unwrap();
        assert_eq!(poll_once(&mut sleep), Poll::Ready(()));
    }

    #[test]
    fn past_deadline_is_ready() {
        let mut sleep = sleep_until(Instant::ZERO);
        assert_eq!(poll_once(&mut sleep), Poll::Ready(()));
    }

    #[test]
    fn long_sleep_is_pending() {
        let mut sleep = sleep(Duration::from_secs(3600)).unwrap();
        assert_eq!(poll_once(&mut sleep), Poll::Pending);
        assert!(sleep.deadline() > Instant::now(), "deadline is in the future");
    }
}
