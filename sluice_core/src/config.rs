// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event loop configuration.

use crate::control_flow::ControlFlow;
use crate::time::Duration;

/// Configuration for an [`EventLoop`](crate::pump::EventLoop).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventLoopConfig {
    /// Control flow in effect before the first about-to-wait handler runs.
    pub initial_control_flow: ControlFlow,
    /// Upper bound on native events taken in one cycle. Anything beyond it
    /// stays queued natively for the next cycle.
    pub max_batch_len: usize,
    /// Timeout for the first (`Init`) cycle.
    pub init_timeout: Duration,
}

impl EventLoopConfig {
    /// Wakes only for native events or deadlines. Suits desktop UI.
    #[must_use]
    pub const fn on_demand() -> Self {
        Self {
            initial_control_flow: ControlFlow::Wait,
            max_batch_len: 256,
            init_timeout: Duration::ZERO,
        }
    }

    /// Pumps continuously. Suits games and animation-heavy hosts.
    #[must_use]
    pub const fn continuous() -> Self {
        Self {
            initial_control_flow: ControlFlow::Poll,
            max_batch_len: 64,
            init_timeout: Duration::ZERO,
        }
    }

    /// Sets the initial control flow.
    #[must_use]
    pub const fn with_initial_control_flow(mut self, flow: ControlFlow) -> Self {
        self.initial_control_flow = flow;
        self
    }

    /// Sets the per-cycle batch limit. Zero is promoted to one.
    #[must_use]
    pub const fn with_max_batch_len(mut self, max_batch_len: usize) -> Self {
        self.max_batch_len = if max_batch_len == 0 { 1 } else { max_batch_len };
        self
    }

    /// Sets the timeout of the first cycle.
    #[must_use]
    pub const fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self::on_demand()
    }
}
