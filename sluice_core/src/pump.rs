// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pump adapter.
//!
//! [`EventLoop::pump`] runs one bounded cycle against the native source:
//!
//! ```text
//!   ControlFlow ──► timeout (clipped to host budget)
//!                        │
//!                        ▼
//!   NativeEventLoop::pump_once ──► NativeBatch
//!                                      │
//!          ┌───────────────────────────┘
//!          ▼
//!   new_events(cause) ─► events in delivery order ─► about_to_wait | exiting
//!                                                         │
//!                                                         ▼
//!                                           PumpStatus::Continue | Exit(code)
//! ```
//!
//! The host regains control after every call. Once `Exit(code)` has been
//! returned, every later call returns the same status without touching the
//! native loop or any handler.

use alloc::rc::Rc;
use core::cell::{Cell, Ref, RefCell};
use core::marker::PhantomData;

use thiserror::Error;

use crate::active::{ActiveEventLoop, DispatchGuard, LoopState};
use crate::config::EventLoopConfig;
use crate::control_flow::{ControlFlow, StartCause, clip_timeout};
use crate::dispatch::{Abandoned, BoxError, CallbackDispatcher, CycleProgress, HandlerKind};
use crate::native::{NativeControl, NativeError, NativeEventLoop, NativeStatus};
use crate::time::Duration;
use crate::trace::{CycleBeginEvent, CycleEndEvent, ExitEvent, Tracer};

/// What a pump call reports to the host scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PumpStatus {
    /// Call `pump` again later.
    Continue,
    /// The loop has exited. Terminal.
    Exit(i32),
}

/// Errors returned by [`EventLoop::pump`].
#[derive(Debug, Error)]
pub enum PumpError {
    /// `pump` was called while this loop was already dispatching.
    ///
    /// This is a programming error and it is fatal to the cycle: the nested
    /// call gets this error, and so does the outer call, which abandons the
    /// rest of its cycle even if the handler discarded the nested error.
    #[error("pump called re-entrantly while the loop was dispatching")]
    Reentrant,
    /// A handler returned an error; the rest of the cycle was abandoned.
    #[error("`{handler}` handler failed")]
    Handler {
        /// The failing handler.
        handler: HandlerKind,
        /// The handler's error.
        #[source]
        source: BoxError,
    },
    /// A handler suspended under [`DispatchMode::Direct`](crate::dispatch::DispatchMode::Direct).
    #[error("`{handler}` handler suspended, but the dispatcher is in direct mode")]
    SuspendedInDirectMode {
        /// The offending handler.
        handler: HandlerKind,
    },
    /// The native pump failed.
    #[error(transparent)]
    Native(#[from] NativeError),
}

/// Drives a native event loop in bounded cycles.
///
/// `N` is the native collaborator and `T` the user-event payload type. The
/// control-flow slot and exit state belong to this instance alone, so
/// several loops can coexist (for example in tests).
pub struct EventLoop<N, T = ()> {
    native: Rc<RefCell<N>>,
    state: Rc<LoopState>,
    config: EventLoopConfig,
    cycles: Cell<u64>,
    native_shutdown: Cell<bool>,
    torn_down: Cell<bool>,
    exit: Cell<Option<i32>>,
    _user: PhantomData<fn(T)>,
}

impl<N, T> core::fmt::Debug for EventLoop<N, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventLoop")
            .field("config", &self.config)
            .field("control_flow", &self.state.control_flow())
            .field("cycles", &self.cycles.get())
            .field("exit", &self.exit.get())
            .finish_non_exhaustive()
    }
}

impl<N, T> EventLoop<N, T>
where
    N: NativeEventLoop<T> + 'static,
    T: 'static,
{
    /// Wraps `native` with the default configuration.
    pub fn new(native: N) -> Self {
        Self::with_config(native, EventLoopConfig::default())
    }

    /// Wraps `native` with the given configuration.
    pub fn with_config(native: N, config: EventLoopConfig) -> Self {
        let native = Rc::new(RefCell::new(native));
        let control: Rc<RefCell<dyn NativeControl>> = native.clone();
        Self {
            state: Rc::new(LoopState::new(control, config.initial_control_flow)),
            native,
            config,
            cycles: Cell::new(0),
            native_shutdown: Cell::new(false),
            torn_down: Cell::new(false),
            exit: Cell::new(None),
            _user: PhantomData,
        }
    }

    /// Borrows the native collaborator.
    ///
    /// # Panics
    ///
    /// Panics if called from a handler while the native loop is borrowed.
    #[must_use]
    pub fn native(&self) -> Ref<'_, N> {
        self.native.borrow()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EventLoopConfig {
        &self.config
    }

    /// Returns the control flow that will govern the next native wait.
    #[must_use]
    pub fn control_flow(&self) -> ControlFlow {
        self.state.control_flow()
    }

    /// Returns the number of cycles started so far.
    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycles.get()
    }

    /// Returns the terminal exit code, once the loop has exited.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit.get()
    }

    /// Runs one bounded pump cycle.
    ///
    /// `host_timeout` caps how long the native source may block (`None`
    /// leaves the wait to the control flow alone). Pass the same
    /// `callbacks` on every call.
    ///
    /// A cycle only counts as started once the native pump succeeds. If the
    /// very first native pump fails, the next call is still the `Init`
    /// cycle and uses [`EventLoopConfig::init_timeout`] again.
    ///
    /// A handler error abandons the rest of the cycle and the loop stays
    /// usable, except after the exiting handler has run: then the loop
    /// exits anyway and the next call returns `Exit(code)`.
    pub fn pump(
        &self,
        host_timeout: Option<Duration>,
        callbacks: &mut CallbackDispatcher<T>,
    ) -> Result<PumpStatus, PumpError> {
        self.pump_traced(host_timeout, callbacks, &mut Tracer::none())
    }

    /// Like [`pump`](Self::pump), reporting cycle and handler events to
    /// `tracer`.
    pub fn pump_traced(
        &self,
        host_timeout: Option<Duration>,
        callbacks: &mut CallbackDispatcher<T>,
        tracer: &mut Tracer<'_>,
    ) -> Result<PumpStatus, PumpError> {
        if let Some(code) = self.exit.get() {
            return Ok(PumpStatus::Exit(code));
        }
        let Some(_guard) = DispatchGuard::enter(&self.state) else {
            log::error!("rejecting re-entrant pump call");
            return Err(PumpError::Reentrant);
        };
        let el = ActiveEventLoop::new(Rc::clone(&self.state));

        // A suspended handler owns the cycle: no native call and no new
        // timeout until it resolves.
        if !callbacks.is_mid_cycle() {
            self.begin_cycle(host_timeout, callbacks, tracer)?;
        }

        match callbacks.drive(&el, tracer) {
            Ok(CycleProgress::Suspended) => Ok(PumpStatus::Continue),
            Ok(CycleProgress::Complete { events_dispatched }) => {
                Ok(self.end_cycle(events_dispatched, None, tracer))
            }
            Err(abandoned) => {
                self.end_cycle(abandoned.events_dispatched, Some(&abandoned), tracer);
                Err(abandoned.error)
            }
        }
    }

    fn begin_cycle(
        &self,
        host_timeout: Option<Duration>,
        callbacks: &mut CallbackDispatcher<T>,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), PumpError> {
        let index = self.cycles.get();
        let first = index == 0;
        let prior = self.state.control_flow();
        let start = self.state.now();

        let flow_timeout = if first {
            Some(self.config.init_timeout)
        } else if self.state.exit_code().is_some() {
            Some(Duration::ZERO)
        } else {
            prior.timeout(start)
        };
        let timeout = clip_timeout(flow_timeout, host_timeout);

        let batch = self
            .native
            .borrow_mut()
            .pump_once(timeout, self.config.max_batch_len)?;
        let now = self.state.now();

        let cause = if first {
            log::debug!("starting first pump cycle");
            StartCause::Init
        } else {
            StartCause::classify(prior, start, now)
        };
        if let NativeStatus::Exit(code) = batch.status {
            log::debug!("native loop is shutting down with code {code}");
            self.native_shutdown.set(true);
            self.state.record_exit(code);
        }
        log::trace!(
            "cycle {index}: {} after {timeout:?}, {} events",
            cause.name(),
            batch.events.len()
        );

        self.cycles.set(index + 1);
        tracer.cycle_begin(&CycleBeginEvent {
            cycle_index: index,
            cause,
            timeout,
            batch_len: u32::try_from(batch.events.len()).unwrap_or(u32::MAX),
            timestamp: now,
        });
        callbacks.begin_cycle(index, cause, batch.events);
        Ok(())
    }

    fn end_cycle(
        &self,
        events_dispatched: u32,
        abandoned: Option<&Abandoned>,
        tracer: &mut Tracer<'_>,
    ) -> PumpStatus {
        let timestamp = self.state.now();
        tracer.cycle_end(&CycleEndEvent {
            cycle_index: self.cycles.get().saturating_sub(1),
            events_dispatched,
            control_flow: self.state.control_flow(),
            aborted: abandoned.is_some(),
            timestamp,
        });

        // An aborted cycle ends the loop only when the platform itself is
        // going away or `exiting` already ran. Otherwise an application exit
        // request stays pending and the next cycle delivers `exiting`.
        let finishes_exit = match abandoned {
            None => true,
            Some(abandoned) => abandoned.exit_delivered || self.native_shutdown.get(),
        };
        let exit = if finishes_exit {
            self.state.exit_code()
        } else {
            None
        };
        let Some(code) = exit else {
            return PumpStatus::Continue;
        };

        if !self.torn_down.replace(true) {
            log::debug!("tearing down native loop, exit code {code}");
            self.native.borrow_mut().teardown();
        }
        self.exit.set(Some(code));
        tracer.exit(&ExitEvent { code, timestamp });
        PumpStatus::Exit(code)
    }
}
