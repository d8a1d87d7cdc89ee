// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clock selection for the headless loop.

use std::sync::{Arc, Mutex, PoisonError};

use sluice_core::time::{Duration, Instant, TimeError};

/// Clock source the headless loop reads and waits on.
#[derive(Clone, Debug, Default)]
pub enum Clock {
    /// The process monotonic clock. Timed waits block the thread.
    #[default]
    Monotonic,
    /// A clock that only moves when told to. A timed wait with nothing
    /// queued advances it by the full timeout instead of blocking.
    Manual(ManualClock),
}

impl Clock {
    /// Reads the clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        match self {
            Self::Monotonic => Instant::now(),
            Self::Manual(clock) => clock.now(),
        }
    }
}

/// A shareable, manually advanced clock.
///
/// Clones observe the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Returns the current reading.
    #[must_use]
    pub fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) -> Result<Instant, TimeError> {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.checked_add(by)?;
        Ok(*now)
    }

    /// Sets the reading. Moving backwards is allowed; callers own the
    /// consequences.
    pub fn set(&self, to: Instant) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}
