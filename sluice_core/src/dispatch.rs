// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application's handler table and the rules for invoking it.
//!
//! A [`CallbackDispatcher`] owns one optional callback per handler kind and
//! a [`DispatchMode`] chosen at construction:
//!
//! - [`DispatchMode::Direct`]: every callback must finish before returning.
//!   A callback that hands back a suspended future is an error.
//! - [`DispatchMode::Suspendable`]: a callback may return a future through
//!   [`HandlerReply::suspend`]. At most one such future is in flight; the
//!   rest of the cycle (queued events, about-to-wait, exiting) waits for it.
//!
//! Within a cycle the order is fixed: new-events, then each native event in
//! delivery order, then about-to-wait, or exiting once an exit has been
//! requested.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

use crate::active::ActiveEventLoop;
use crate::control_flow::StartCause;
use crate::event::{DeviceEvent, DeviceId, NativeEvent, WindowEvent, WindowId};
use crate::pump::PumpError;
use crate::trace::{
    HandlerBeginEvent, HandlerEndEvent, HandlerOutcome, HandlerSuspendedEvent, Tracer,
};

/// Error type returned by application handlers.
pub type BoxError = Box<dyn core::error::Error + 'static>;

/// A suspended handler computation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>>>>;

/// How handlers are allowed to complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Handlers run to completion in-line.
    Direct,
    /// Handlers may suspend; invocations are serialized.
    Suspendable,
}

/// Names a slot in the handler table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Start of every cycle.
    NewEvents,
    /// [`NativeEvent::Resumed`].
    Resumed,
    /// [`NativeEvent::Window`].
    WindowEvent,
    /// [`NativeEvent::Device`].
    DeviceEvent,
    /// [`NativeEvent::User`].
    UserEvent,
    /// [`NativeEvent::Suspended`].
    Suspended,
    /// End of a cycle that is not exiting.
    AboutToWait,
    /// End of the final cycle.
    Exiting,
    /// [`NativeEvent::MemoryWarning`].
    MemoryWarning,
}

impl HandlerKind {
    /// The handler's name for logs and traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewEvents => "new_events",
            Self::Resumed => "resumed",
            Self::WindowEvent => "window_event",
            Self::DeviceEvent => "device_event",
            Self::UserEvent => "user_event",
            Self::Suspended => "suspended",
            Self::AboutToWait => "about_to_wait",
            Self::Exiting => "exiting",
            Self::MemoryWarning => "memory_warning",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a callback hands back to the dispatcher.
pub enum HandlerReply {
    /// The handler finished.
    Done(Result<(), BoxError>),
    /// The handler suspended; the future finishes its work.
    Suspended(HandlerFuture),
}

impl HandlerReply {
    /// Wraps a future as a suspended reply.
    pub fn suspend<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Into<BoxError>,
    {
        Self::Suspended(Box::pin(async move { future.await.map_err(Into::into) }))
    }
}

impl fmt::Debug for HandlerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(result) => f.debug_tuple("Done").field(&result.is_ok()).finish(),
            Self::Suspended(_) => f.write_str("Suspended"),
        }
    }
}

impl From<()> for HandlerReply {
    fn from((): ()) -> Self {
        Self::Done(Ok(()))
    }
}

impl<E: Into<BoxError>> From<Result<(), E>> for HandlerReply {
    fn from(result: Result<(), E>) -> Self {
        Self::Done(result.map_err(Into::into))
    }
}

type Callback<A> = Box<dyn FnMut(&ActiveEventLoop, A) -> HandlerReply>;
type Notify = Box<dyn FnMut(&ActiveEventLoop) -> HandlerReply>;

struct HandlerTable<T> {
    new_events: Option<Callback<StartCause>>,
    resumed: Option<Notify>,
    window_event: Option<Callback<(WindowId, WindowEvent)>>,
    device_event: Option<Callback<(DeviceId, DeviceEvent)>>,
    user_event: Option<Callback<T>>,
    suspended: Option<Notify>,
    about_to_wait: Option<Notify>,
    exiting: Option<Notify>,
    memory_warning: Option<Notify>,
}

impl<T> HandlerTable<T> {
    fn empty() -> Self {
        Self {
            new_events: None,
            resumed: None,
            window_event: None,
            device_event: None,
            user_event: None,
            suspended: None,
            about_to_wait: None,
            exiting: None,
            memory_warning: None,
        }
    }

    fn call<A>(slot: &mut Option<Callback<A>>, el: &ActiveEventLoop, arg: A) -> HandlerReply {
        match slot {
            Some(f) => f(el, arg),
            None => HandlerReply::Done(Ok(())),
        }
    }

    fn notify(slot: &mut Option<Notify>, el: &ActiveEventLoop) -> HandlerReply {
        match slot {
            Some(f) => f(el),
            None => HandlerReply::Done(Ok(())),
        }
    }

    fn dispatch(&mut self, el: &ActiveEventLoop, event: NativeEvent<T>) -> (HandlerKind, HandlerReply) {
        match event {
            NativeEvent::Window { window_id, event } => (
                HandlerKind::WindowEvent,
                Self::call(&mut self.window_event, el, (window_id, event)),
            ),
            NativeEvent::Device { device_id, event } => (
                HandlerKind::DeviceEvent,
                Self::call(&mut self.device_event, el, (device_id, event)),
            ),
            NativeEvent::User(payload) => (
                HandlerKind::UserEvent,
                Self::call(&mut self.user_event, el, payload),
            ),
            NativeEvent::Resumed => (HandlerKind::Resumed, Self::notify(&mut self.resumed, el)),
            NativeEvent::Suspended => (
                HandlerKind::Suspended,
                Self::notify(&mut self.suspended, el),
            ),
            NativeEvent::MemoryWarning => (
                HandlerKind::MemoryWarning,
                Self::notify(&mut self.memory_warning, el),
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    NewEvents,
    Events,
    AboutToWait,
    AfterWait,
    Exiting,
    /// The exiting handler has been called.
    Exited,
    Done,
}

struct Cycle<T> {
    index: u64,
    cause: StartCause,
    events: VecDeque<NativeEvent<T>>,
    stage: Stage,
    dispatched: u32,
}

struct InFlight {
    handler: HandlerKind,
    future: HandlerFuture,
}

/// Result of driving the current cycle as far as it can go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CycleProgress {
    /// A handler is suspended; call again to resume.
    Suspended,
    /// Every stage ran.
    Complete {
        /// Native events delivered in the cycle.
        events_dispatched: u32,
    },
}

/// A cycle cut short by an error.
#[derive(Debug)]
pub(crate) struct Abandoned {
    /// Why the cycle stopped.
    pub(crate) error: PumpError,
    /// Native events delivered before it stopped.
    pub(crate) events_dispatched: u32,
    /// The exiting handler had already been called.
    pub(crate) exit_delivered: bool,
}

/// The application's handler table plus the dispatch state of the current
/// cycle.
///
/// Pass the same dispatcher to every [`EventLoop::pump`](crate::pump::EventLoop::pump)
/// call: a suspended cycle lives here until it completes.
pub struct CallbackDispatcher<T = ()> {
    mode: DispatchMode,
    handlers: HandlerTable<T>,
    cycle: Option<Cycle<T>>,
    in_flight: Option<InFlight>,
}

impl<T> fmt::Debug for CallbackDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("mode", &self.mode)
            .field("cycle", &self.cycle.as_ref().map(|c| (c.index, c.stage)))
            .field("in_flight", &self.in_flight.as_ref().map(|i| i.handler))
            .finish_non_exhaustive()
    }
}

macro_rules! notify_setter {
    ($(#[$doc:meta])* $name:ident, $slot:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name<F, R>(mut self, mut f: F) -> Self
        where
            F: FnMut(&ActiveEventLoop) -> R + 'static,
            R: Into<HandlerReply>,
        {
            self.handlers.$slot = Some(Box::new(move |el: &ActiveEventLoop| f(el).into()));
            self
        }
    };
}

impl<T: 'static> CallbackDispatcher<T> {
    /// Creates an empty handler table with the given mode.
    #[must_use]
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            handlers: HandlerTable::empty(),
            cycle: None,
            in_flight: None,
        }
    }

    /// Shorthand for `new(DispatchMode::Direct)`.
    #[must_use]
    pub fn direct() -> Self {
        Self::new(DispatchMode::Direct)
    }

    /// Shorthand for `new(DispatchMode::Suspendable)`.
    #[must_use]
    pub fn suspendable() -> Self {
        Self::new(DispatchMode::Suspendable)
    }

    /// Returns the dispatch mode.
    #[must_use]
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Sets the handler called first in every cycle.
    #[must_use]
    pub fn on_new_events<F, R>(mut self, mut f: F) -> Self
    where
        F: FnMut(&ActiveEventLoop, StartCause) -> R + 'static,
        R: Into<HandlerReply>,
    {
        self.handlers.new_events = Some(Box::new(move |el: &ActiveEventLoop, cause: StartCause| {
            f(el, cause).into()
        }));
        self
    }

    /// Sets the handler for window events.
    #[must_use]
    pub fn on_window_event<F, R>(mut self, mut f: F) -> Self
    where
        F: FnMut(&ActiveEventLoop, WindowId, WindowEvent) -> R + 'static,
        R: Into<HandlerReply>,
    {
        self.handlers.window_event = Some(Box::new(
            move |el: &ActiveEventLoop, (id, event): (WindowId, WindowEvent)| f(el, id, event).into(),
        ));
        self
    }

    /// Sets the handler for raw device events.
    #[must_use]
    pub fn on_device_event<F, R>(mut self, mut f: F) -> Self
    where
        F: FnMut(&ActiveEventLoop, DeviceId, DeviceEvent) -> R + 'static,
        R: Into<HandlerReply>,
    {
        self.handlers.device_event = Some(Box::new(
            move |el: &ActiveEventLoop, (id, event): (DeviceId, DeviceEvent)| f(el, id, event).into(),
        ));
        self
    }

    /// Sets the handler for user events sent through a proxy.
    #[must_use]
    pub fn on_user_event<F, R>(mut self, mut f: F) -> Self
    where
        F: FnMut(&ActiveEventLoop, T) -> R + 'static,
        R: Into<HandlerReply>,
    {
        self.handlers.user_event = Some(Box::new(move |el: &ActiveEventLoop, payload: T| {
            f(el, payload).into()
        }));
        self
    }

    notify_setter!(
        /// Sets the handler for [`NativeEvent::Resumed`].
        on_resumed, resumed
    );
    notify_setter!(
        /// Sets the handler for [`NativeEvent::Suspended`].
        on_suspended, suspended
    );
    notify_setter!(
        /// Sets the handler called last in every non-exiting cycle. This is
        /// where the application picks the next control flow.
        on_about_to_wait, about_to_wait
    );
    notify_setter!(
        /// Sets the handler called once, last, when the loop exits.
        on_exiting, exiting
    );
    notify_setter!(
        /// Sets the handler for [`NativeEvent::MemoryWarning`].
        on_memory_warning, memory_warning
    );

    /// Returns `true` while a cycle is started but not finished.
    #[must_use]
    pub fn is_mid_cycle(&self) -> bool {
        self.cycle.is_some() || self.in_flight.is_some()
    }

    /// Returns the handler whose future is pending, if any.
    #[must_use]
    pub fn suspended_handler(&self) -> Option<HandlerKind> {
        self.in_flight.as_ref().map(|i| i.handler)
    }

    pub(crate) fn begin_cycle(
        &mut self,
        index: u64,
        cause: StartCause,
        events: impl IntoIterator<Item = NativeEvent<T>>,
    ) {
        self.cycle = Some(Cycle {
            index,
            cause,
            events: events.into_iter().collect(),
            stage: Stage::NewEvents,
            dispatched: 0,
        });
    }

    /// Runs the current cycle until it completes, suspends or fails.
    ///
    /// On failure the rest of the cycle is abandoned.
    pub(crate) fn drive(
        &mut self,
        el: &ActiveEventLoop,
        tracer: &mut Tracer<'_>,
    ) -> Result<CycleProgress, Abandoned> {
        self.drive_inner(el, tracer).map_err(|error| self.abandon(error))
    }

    fn drive_inner(
        &mut self,
        el: &ActiveEventLoop,
        tracer: &mut Tracer<'_>,
    ) -> Result<CycleProgress, PumpError> {
        let cycle_index = self.cycle.as_ref().map_or(0, |c| c.index);
        loop {
            if let Some(in_flight) = self.in_flight.as_mut() {
                let mut cx = Context::from_waker(Waker::noop());
                let polled = in_flight.future.as_mut().poll(&mut cx);
                let handler = in_flight.handler;
                Self::check_reentry(el, tracer, cycle_index, handler)?;
                let Poll::Ready(result) = polled else {
                    return Ok(CycleProgress::Suspended);
                };
                self.in_flight = None;
                Self::finish(el, tracer, cycle_index, handler, result)?;
                continue;
            }

            let Some((handler, reply)) = self.step(el, tracer, cycle_index) else {
                let events_dispatched = self.cycle.take().map_or(0, |c| c.dispatched);
                return Ok(CycleProgress::Complete { events_dispatched });
            };
            Self::check_reentry(el, tracer, cycle_index, handler)?;
            match reply {
                HandlerReply::Done(result) => Self::finish(el, tracer, cycle_index, handler, result)?,
                HandlerReply::Suspended(future) => match self.mode {
                    DispatchMode::Direct => {
                        tracer.handler_end(&HandlerEndEvent {
                            cycle_index,
                            handler,
                            outcome: HandlerOutcome::Failed,
                            timestamp: el.now(),
                        });
                        return Err(PumpError::SuspendedInDirectMode { handler });
                    }
                    DispatchMode::Suspendable => {
                        tracer.handler_suspended(&HandlerSuspendedEvent {
                            cycle_index,
                            handler,
                            timestamp: el.now(),
                        });
                        self.in_flight = Some(InFlight { handler, future });
                    }
                },
            }
        }
    }

    /// Fails the cycle if `handler` tried to pump this loop while it ran.
    fn check_reentry(
        el: &ActiveEventLoop,
        tracer: &mut Tracer<'_>,
        cycle_index: u64,
        handler: HandlerKind,
    ) -> Result<(), PumpError> {
        if !el.take_reentry() {
            return Ok(());
        }
        log::error!("`{handler}` handler pumped the loop re-entrantly");
        tracer.handler_end(&HandlerEndEvent {
            cycle_index,
            handler,
            outcome: HandlerOutcome::Failed,
            timestamp: el.now(),
        });
        Err(PumpError::Reentrant)
    }

    fn finish(
        el: &ActiveEventLoop,
        tracer: &mut Tracer<'_>,
        cycle_index: u64,
        handler: HandlerKind,
        result: Result<(), BoxError>,
    ) -> Result<(), PumpError> {
        let outcome = match result {
            Ok(()) => HandlerOutcome::Completed,
            Err(_) => HandlerOutcome::Failed,
        };
        tracer.handler_end(&HandlerEndEvent {
            cycle_index,
            handler,
            outcome,
            timestamp: el.now(),
        });
        result.map_err(|source| PumpError::Handler { handler, source })
    }

    /// Invokes the next handler of the cycle, or returns `None` when every
    /// stage has run.
    fn step(
        &mut self,
        el: &ActiveEventLoop,
        tracer: &mut Tracer<'_>,
        cycle_index: u64,
    ) -> Option<(HandlerKind, HandlerReply)> {
        let cycle = self.cycle.as_mut()?;
        let handlers = &mut self.handlers;
        let mut begin = |handler: HandlerKind| {
            tracer.handler_begin(&HandlerBeginEvent {
                cycle_index,
                handler,
                timestamp: el.now(),
            });
        };
        loop {
            match cycle.stage {
                Stage::NewEvents => {
                    cycle.stage = Stage::Events;
                    begin(HandlerKind::NewEvents);
                    let reply = HandlerTable::<T>::call(&mut handlers.new_events, el, cycle.cause);
                    return Some((HandlerKind::NewEvents, reply));
                }
                Stage::Events => match cycle.events.pop_front() {
                    Some(event) => {
                        cycle.dispatched += 1;
                        begin(handler_for(&event));
                        return Some(handlers.dispatch(el, event));
                    }
                    None if el.exiting() => cycle.stage = Stage::Exiting,
                    None => cycle.stage = Stage::AboutToWait,
                },
                Stage::AboutToWait => {
                    cycle.stage = Stage::AfterWait;
                    begin(HandlerKind::AboutToWait);
                    let reply = HandlerTable::<T>::notify(&mut handlers.about_to_wait, el);
                    return Some((HandlerKind::AboutToWait, reply));
                }
                Stage::AfterWait if el.exiting() => cycle.stage = Stage::Exiting,
                Stage::AfterWait => cycle.stage = Stage::Done,
                Stage::Exiting => {
                    cycle.stage = Stage::Exited;
                    begin(HandlerKind::Exiting);
                    let reply = HandlerTable::<T>::notify(&mut handlers.exiting, el);
                    return Some((HandlerKind::Exiting, reply));
                }
                Stage::Exited | Stage::Done => return None,
            }
        }
    }

    /// Drops the rest of the cycle after `error`.
    fn abandon(&mut self, error: PumpError) -> Abandoned {
        self.in_flight = None;
        let Some(cycle) = self.cycle.take() else {
            return Abandoned {
                error,
                events_dispatched: 0,
                exit_delivered: false,
            };
        };
        if !cycle.events.is_empty() {
            log::warn!(
                "abandoning cycle {} with {} undelivered events",
                cycle.index,
                cycle.events.len()
            );
        }
        Abandoned {
            error,
            events_dispatched: cycle.dispatched,
            exit_delivered: cycle.stage == Stage::Exited,
        }
    }
}

fn handler_for<T>(event: &NativeEvent<T>) -> HandlerKind {
    match event {
        NativeEvent::Window { .. } => HandlerKind::WindowEvent,
        NativeEvent::Device { .. } => HandlerKind::DeviceEvent,
        NativeEvent::User(_) => HandlerKind::UserEvent,
        NativeEvent::Resumed => HandlerKind::Resumed,
        NativeEvent::Suspended => HandlerKind::Suspended,
        NativeEvent::MemoryWarning => HandlerKind::MemoryWarning,
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn unit_and_ok_replies_are_done() {
        assert!(matches!(HandlerReply::from(()), HandlerReply::Done(Ok(()))));
        let ok: Result<(), &str> = Ok(());
        assert!(matches!(HandlerReply::from(ok), HandlerReply::Done(Ok(()))));
    }

    #[test]
    fn error_reply_keeps_message() {
        let HandlerReply::Done(Err(error)) = HandlerReply::from(Err::<(), _>("no surface")) else {
            panic!("expected an error reply");
        };
        assert_eq!(error.to_string(), "no surface");
    }

    #[test]
    fn events_map_to_their_handler() {
        let event = NativeEvent::<()>::Window {
            window_id: WindowId(3),
            event: WindowEvent::CloseRequested,
        };
        assert_eq!(handler_for(&event), HandlerKind::WindowEvent);
        assert_eq!(handler_for(&NativeEvent::<u8>::User(1)), HandlerKind::UserEvent);
        assert_eq!(handler_for(&NativeEvent::<()>::Suspended), HandlerKind::Suspended);
        assert_eq!(HandlerKind::AboutToWait.to_string(), "about_to_wait");
    }

    #[test]
    fn fresh_dispatcher_is_idle() {
        let dispatcher = CallbackDispatcher::<()>::suspendable().on_exiting(|_| ());
        assert_eq!(dispatcher.mode(), DispatchMode::Suspendable);
        assert!(!dispatcher.is_mid_cycle());
        assert_eq!(dispatcher.suspended_handler(), None);
    }
}
