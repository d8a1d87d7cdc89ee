// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The headless native loop.
//!
//! # Batch assembly
//!
//! ```text
//! pump_once(timeout, max_events)
//!   1. Resumed, on the first pump only
//!   2. wait (condvar or manual clock) while nothing is queued
//!   3. queued proxy events, oldest first
//!        - window events for unknown windows are dropped
//!        - device events pass the DeviceEvents filter
//!   4. one RedrawRequested per window with a pending redraw
//! ```
//!
//! Each step stops once `max_events` events are in the batch; the rest stays
//! queued for the next pump.

use std::collections::BTreeMap;
use std::sync::{Arc, MutexGuard, PoisonError};

use kurbo::Size;
use sluice_core::event::{DeviceEvents, NativeEvent, WindowAttributes, WindowEvent, WindowId};
use sluice_core::native::{NativeBatch, NativeControl, NativeError, NativeEventLoop, NativeStatus};
use sluice_core::time::{Duration, Instant};

use crate::clock::Clock;
use crate::proxy::{EventLoopProxy, Inbox, Shared};

/// Configuration for a [`HeadlessEventLoop`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessConfig {
    /// Capacity of the proxy inbox. Overflow evicts the oldest event.
    pub queue_capacity: usize,
    /// Size given to windows created without an explicit size.
    pub default_window_size: Size,
}

impl HeadlessConfig {
    /// Default inbox capacity.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            default_window_size: Size::new(800.0, 600.0),
        }
    }

    /// Sets the inbox capacity. Zero is promoted to one.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }

    /// Sets the fallback window size.
    #[must_use]
    pub const fn with_default_window_size(mut self, size: Size) -> Self {
        self.default_window_size = size;
        self
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A window known to the headless loop.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessWindow {
    attributes: WindowAttributes,
    size: Size,
    focused: bool,
}

impl HeadlessWindow {
    /// The attributes the window was created with.
    #[must_use]
    pub fn attributes(&self) -> &WindowAttributes {
        &self.attributes
    }

    /// The current inner size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether the window holds input focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

/// A native event loop with no display connection.
///
/// Implements [`NativeEventLoop`] so an
/// [`EventLoop`](sluice_core::pump::EventLoop) can drive it exactly like a
/// platform loop.
pub struct HeadlessEventLoop<T = ()> {
    shared: Arc<Shared<T>>,
    clock: Clock,
    config: HeadlessConfig,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    next_window: u64,
    redraws: Vec<WindowId>,
    device_events: DeviceEvents,
    resumed: bool,
    closed: bool,
}

impl<T> std::fmt::Debug for HeadlessEventLoop<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessEventLoop")
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("windows", &self.windows.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<T> Default for HeadlessEventLoop<T> {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl<T> HeadlessEventLoop<T> {
    /// Creates a loop on the monotonic clock.
    #[must_use]
    pub fn new(config: HeadlessConfig) -> Self {
        Self::with_clock(config, Clock::Monotonic)
    }

    /// Creates a loop on the given clock.
    #[must_use]
    pub fn with_clock(config: HeadlessConfig, clock: Clock) -> Self {
        Self {
            shared: Arc::new(Shared::new(config.queue_capacity)),
            clock,
            config,
            windows: BTreeMap::new(),
            next_window: 1,
            redraws: Vec::new(),
            device_events: DeviceEvents::default(),
            resumed: false,
            closed: false,
        }
    }

    /// Returns a proxy for injecting events.
    #[must_use]
    pub fn create_proxy(&self) -> EventLoopProxy<T> {
        EventLoopProxy::new(Arc::clone(&self.shared))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    /// Looks up a live window.
    #[must_use]
    pub fn window(&self, window_id: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&window_id)
    }

    /// Returns the number of live windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Returns the current device-event filter.
    #[must_use]
    pub fn device_events(&self) -> DeviceEvents {
        self.device_events
    }

    /// Returns how many queued events were evicted because the inbox was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.shared.lock().queue.dropped_count()
    }

    /// Returns `true` once the loop has been torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn device_events_enabled(&self) -> bool {
        match self.device_events {
            DeviceEvents::Always => true,
            DeviceEvents::WhenFocused => self.windows.values().any(|w| w.focused),
            DeviceEvents::Never => false,
        }
    }

    /// Blocks until the inbox has something to report or `timeout` passes.
    fn wait<'a>(
        &self,
        shared: &'a Shared<T>,
        inbox: MutexGuard<'a, Inbox<T>>,
        timeout: Option<Duration>,
    ) -> MutexGuard<'a, Inbox<T>> {
        if !inbox.is_idle() {
            return inbox;
        }
        match (&self.clock, timeout) {
            (_, Some(timeout)) if timeout.is_zero() => inbox,
            (Clock::Manual(clock), Some(timeout)) => {
                if let Err(err) = clock.advance(timeout) {
                    log::warn!("manual clock cannot advance by {timeout:?}: {err}");
                }
                inbox
            }
            (Clock::Monotonic, Some(timeout)) => {
                match shared
                    .wake
                    .wait_timeout_while(inbox, timeout.into(), |inbox| inbox.is_idle())
                {
                    Ok((inbox, _)) => inbox,
                    Err(poisoned) => poisoned.into_inner().0,
                }
            }
            (_, None) => shared
                .wake
                .wait_while(inbox, |inbox| inbox.is_idle())
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Applies an event's effect on loop state and decides whether it is
    /// reported.
    fn admit(&mut self, event: NativeEvent<T>) -> Option<NativeEvent<T>> {
        match event {
            NativeEvent::Window { window_id, event } => {
                let Some(window) = self.windows.get_mut(&window_id) else {
                    log::debug!("dropping {event:?} for unknown window {}", window_id.0);
                    return None;
                };
                match &event {
                    WindowEvent::Resized(size) => window.size = *size,
                    WindowEvent::Focused(focused) => window.focused = *focused,
                    WindowEvent::RedrawRequested => self.redraws.retain(|id| *id != window_id),
                    WindowEvent::Destroyed => {
                        self.windows.remove(&window_id);
                        self.redraws.retain(|id| *id != window_id);
                    }
                    _ => {}
                }
                Some(NativeEvent::Window { window_id, event })
            }
            NativeEvent::Device { .. } if !self.device_events_enabled() => None,
            other => Some(other),
        }
    }
}

impl<T> NativeControl for HeadlessEventLoop<T> {
    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<WindowId, NativeError> {
        if self.closed {
            return Err(NativeError::Closed);
        }
        if let (Some(min), Some(max)) = (attributes.min_inner_size, attributes.max_inner_size)
            && (min.width > max.width || min.height > max.height)
        {
            return Err(NativeError::WindowCreation(format!(
                "minimum size {min:?} exceeds maximum size {max:?}"
            )));
        }

        let window_id = WindowId(self.next_window);
        self.next_window += 1;
        let size = attributes.constrained_size(self.config.default_window_size);
        log::debug!(
            "created window {} {:?} at {size:?}",
            window_id.0,
            attributes.title
        );
        self.windows.insert(
            window_id,
            HeadlessWindow {
                attributes: attributes.clone(),
                size,
                focused: false,
            },
        );
        if attributes.visible {
            self.redraws.push(window_id);
        }
        Ok(window_id)
    }

    fn request_redraw(&mut self, window_id: WindowId) {
        if !self.windows.contains_key(&window_id) {
            log::warn!("redraw requested for unknown window {}", window_id.0);
            return;
        }
        if !self.redraws.contains(&window_id) {
            self.redraws.push(window_id);
        }
    }

    fn request_exit(&mut self, code: i32) {
        if self.shared.record_exit(code).is_err() {
            log::debug!("exit request after teardown ignored");
        }
    }

    fn listen_device_events(&mut self, filter: DeviceEvents) {
        self.device_events = filter;
    }
}

impl<T> NativeEventLoop<T> for HeadlessEventLoop<T> {
    fn pump_once(
        &mut self,
        timeout: Option<Duration>,
        max_events: usize,
    ) -> Result<NativeBatch<T>, NativeError> {
        if self.closed {
            return Err(NativeError::Closed);
        }
        let max_events = max_events.max(1);
        let mut events = Vec::new();
        if !self.resumed {
            self.resumed = true;
            events.push(NativeEvent::Resumed);
        }

        let shared = Arc::clone(&self.shared);
        let mut inbox = shared.lock();
        if events.is_empty() && self.redraws.is_empty() {
            inbox = self.wait(&shared, inbox, timeout);
        }
        let dropped = inbox.queue.take_unreported_drops();
        if dropped > 0 {
            log::warn!("headless inbox overflowed, {dropped} events lost");
        }
        while events.len() < max_events {
            let Some(event) = inbox.queue.pop() else {
                break;
            };
            if let Some(event) = self.admit(event) {
                events.push(event);
            }
        }
        let status = match inbox.exit {
            Some(code) => NativeStatus::Exit(code),
            None => NativeStatus::Continue,
        };
        drop(inbox);

        let room = max_events.saturating_sub(events.len()).min(self.redraws.len());
        events.extend(
            self.redraws
                .drain(..room)
                .map(|window_id| NativeEvent::Window {
                    window_id,
                    event: WindowEvent::RedrawRequested,
                }),
        );

        Ok(NativeBatch { status, events })
    }

    fn teardown(&mut self) {
        log::debug!(
            "tearing down headless loop with {} windows",
            self.windows.len()
        );
        self.closed = true;
        self.windows.clear();
        self.redraws.clear();
        let mut inbox = self.shared.lock();
        inbox.closed = true;
        inbox.queue.clear();
    }
}
