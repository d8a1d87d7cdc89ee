// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-thread event injection.
//!
//! Everything the headless loop reports comes through an [`EventLoopProxy`]:
//! user payloads, synthetic window and device input, lifecycle changes and
//! platform-initiated exits. Proxies are cheap to clone and are `Send` when
//! the payload type is.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use sluice_core::event::{DeviceEvent, DeviceId, NativeEvent, WindowEvent, WindowId};

use crate::queue::BoundedQueue;

/// State behind the lock shared by the loop and its proxies.
pub(crate) struct Inbox<T> {
    pub(crate) queue: BoundedQueue<NativeEvent<T>>,
    pub(crate) exit: Option<i32>,
    pub(crate) closed: bool,
}

impl<T> Inbox<T> {
    /// Nothing to report: a wait may block.
    pub(crate) fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.exit.is_none()
    }
}

pub(crate) struct Shared<T> {
    inbox: Mutex<Inbox<T>>,
    pub(crate) wake: Condvar,
}

impl<T> Shared<T> {
    pub(crate) fn new(queue_capacity: usize) -> Self {
        Self {
            inbox: Mutex::new(Inbox {
                queue: BoundedQueue::with_capacity(queue_capacity),
                exit: None,
                closed: false,
            }),
            wake: Condvar::new(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Inbox<T>> {
        self.inbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records an exit code and wakes the loop. The first code wins.
    pub(crate) fn record_exit(&self, code: i32) -> Result<(), EventLoopClosed<i32>> {
        let mut inbox = self.lock();
        if inbox.closed {
            return Err(EventLoopClosed(code));
        }
        inbox.exit.get_or_insert(code);
        drop(inbox);
        self.wake.notify_all();
        Ok(())
    }

    fn deliver<E>(
        &self,
        payload: E,
        wrap: impl FnOnce(E) -> NativeEvent<T>,
    ) -> Result<(), EventLoopClosed<E>> {
        let mut inbox = self.lock();
        if inbox.closed {
            return Err(EventLoopClosed(payload));
        }
        if inbox.queue.push(wrap(payload)).is_some() {
            log::debug!("headless inbox full, evicted oldest event");
        }
        drop(inbox);
        self.wake.notify_all();
        Ok(())
    }
}

/// Returned when sending to an event loop that has been torn down. Carries
/// the undelivered payload back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventLoopClosed<T>(pub T);

impl<T> fmt::Display for EventLoopClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("event loop closed")
    }
}

impl<T: fmt::Debug> std::error::Error for EventLoopClosed<T> {}

/// Sends events to a [`HeadlessEventLoop`](crate::HeadlessEventLoop) from
/// any thread.
pub struct EventLoopProxy<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for EventLoopProxy<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for EventLoopProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoopProxy").finish_non_exhaustive()
    }
}

impl<T> EventLoopProxy<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Queues a user event and wakes the loop.
    pub fn send_event(&self, event: T) -> Result<(), EventLoopClosed<T>> {
        self.shared.deliver(event, NativeEvent::User)
    }

    /// Injects a window event. Events for windows the loop does not know
    /// are dropped when the batch is assembled.
    pub fn send_window_event(
        &self,
        window_id: WindowId,
        event: WindowEvent,
    ) -> Result<(), EventLoopClosed<WindowEvent>> {
        self.shared
            .deliver(event, |event| NativeEvent::Window { window_id, event })
    }

    /// Injects a raw device event, subject to the loop's device-event filter.
    pub fn send_device_event(
        &self,
        device_id: DeviceId,
        event: DeviceEvent,
    ) -> Result<(), EventLoopClosed<DeviceEvent>> {
        self.shared
            .deliver(event, |event| NativeEvent::Device { device_id, event })
    }

    /// Signals that the platform is shutting down with `code`.
    pub fn request_exit(&self, code: i32) -> Result<(), EventLoopClosed<i32>> {
        log::debug!("proxy requested exit with code {code}");
        self.shared.record_exit(code)
    }

    /// Queues [`NativeEvent::Suspended`].
    pub fn suspend(&self) -> Result<(), EventLoopClosed<()>> {
        self.shared.deliver((), |()| NativeEvent::Suspended)
    }

    /// Queues [`NativeEvent::Resumed`].
    pub fn resume(&self) -> Result<(), EventLoopClosed<()>> {
        self.shared.deliver((), |()| NativeEvent::Resumed)
    }

    /// Queues [`NativeEvent::MemoryWarning`].
    pub fn memory_warning(&self) -> Result<(), EventLoopClosed<()>> {
        self.shared.deliver((), |()| NativeEvent::MemoryWarning)
    }
}
