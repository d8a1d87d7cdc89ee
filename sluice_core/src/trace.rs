// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the pump loop.
//!
//! [`TraceSink`] has one method per pump-loop event, all defaulting to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing. When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use crate::control_flow::{ControlFlow, StartCause};
use crate::dispatch::HandlerKind;
use crate::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after the native pump returns, before any handler runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleBeginEvent {
    /// Monotonic cycle counter, starting at zero.
    pub cycle_index: u64,
    /// Why the cycle woke up.
    pub cause: StartCause,
    /// Timeout handed to the native pump (`None` is unbounded).
    pub timeout: Option<Duration>,
    /// Number of native events in the batch.
    pub batch_len: u32,
    /// Native clock reading after the pump returned.
    pub timestamp: Instant,
}

/// How a handler invocation finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerOutcome {
    /// The handler returned `Ok`.
    Completed,
    /// The handler returned an error and the cycle was abandoned.
    Failed,
}

/// Marks the start of a handler invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerBeginEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Which handler.
    pub handler: HandlerKind,
    /// Native clock reading.
    pub timestamp: Instant,
}

/// Marks the end of a handler invocation, possibly several pumps after it
/// began if it suspended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerEndEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Which handler.
    pub handler: HandlerKind,
    /// How it finished.
    pub outcome: HandlerOutcome,
    /// Native clock reading.
    pub timestamp: Instant,
}

/// Emitted when a handler suspends and the pump returns to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerSuspendedEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Which handler.
    pub handler: HandlerKind,
    /// Native clock reading.
    pub timestamp: Instant,
}

/// Emitted when a cycle finishes or is abandoned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleEndEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Native events delivered to handlers in this cycle.
    pub events_dispatched: u32,
    /// Control flow that will govern the next native wait.
    pub control_flow: ControlFlow,
    /// `true` if a handler error cut the cycle short.
    pub aborted: bool,
    /// Native clock reading.
    pub timestamp: Instant,
}

/// Emitted once when the loop reaches its terminal exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitEvent {
    /// The exit code every later pump returns.
    pub code: i32,
    /// Native clock reading.
    pub timestamp: Instant,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the pump loop.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when a cycle begins.
    fn on_cycle_begin(&mut self, e: &CycleBeginEvent) {
        _ = e;
    }

    /// Called before a handler runs.
    fn on_handler_begin(&mut self, e: &HandlerBeginEvent) {
        _ = e;
    }

    /// Called when a handler finishes.
    fn on_handler_end(&mut self, e: &HandlerEndEvent) {
        _ = e;
    }

    /// Called when a handler suspends.
    fn on_handler_suspended(&mut self, e: &HandlerSuspendedEvent) {
        _ = e;
    }

    /// Called when a cycle finishes or is abandoned.
    fn on_cycle_end(&mut self, e: &CycleEndEvent) {
        _ = e;
    }

    /// Called once when the loop exits.
    fn on_exit(&mut self, e: &ExitEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Expands to a `Tracer` method that forwards one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident, $method:ident, $event:ty) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`CycleBeginEvent`].
        cycle_begin, on_cycle_begin, CycleBeginEvent
    );
    forward!(
        /// Emits a [`HandlerBeginEvent`].
        handler_begin, on_handler_begin, HandlerBeginEvent
    );
    forward!(
        /// Emits a [`HandlerEndEvent`].
        handler_end, on_handler_end, HandlerEndEvent
    );
    forward!(
        /// Emits a [`HandlerSuspendedEvent`].
        handler_suspended, on_handler_suspended, HandlerSuspendedEvent
    );
    forward!(
        /// Emits a [`CycleEndEvent`].
        cycle_end, on_cycle_end, CycleEndEvent
    );
    forward!(
        /// Emits an [`ExitEvent`].
        exit, on_exit, ExitEvent
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> CycleBeginEvent {
        CycleBeginEvent {
            cycle_index: 3,
            cause: StartCause::Poll,
            timeout: Some(Duration::ZERO),
            batch_len: 2,
            timestamp: Instant::from_offset(Duration::from_millis(5)),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_cycle_begin(&sample_begin());
        sink.on_exit(&ExitEvent {
            code: 0,
            timestamp: Instant::ZERO,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.cycle_begin(&sample_begin());
        tracer.handler_begin(&HandlerBeginEvent {
            cycle_index: 3,
            handler: HandlerKind::AboutToWait,
            timestamp: Instant::ZERO,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            cycles: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_cycle_begin(&mut self, e: &CycleBeginEvent) {
                self.cycles.push(e.cycle_index);
            }
        }

        let mut sink = RecordingSink { cycles: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.cycle_begin(&sample_begin());
        drop(tracer);
        assert_eq!(sink.cycles, &[3]);
    }
}
