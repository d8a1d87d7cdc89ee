// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The handle passed to every handler.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use crate::control_flow::ControlFlow;
use crate::event::{DeviceEvents, WindowAttributes, WindowId};
use crate::native::{NativeControl, NativeError};
use crate::time::{Duration, Instant, TimeError};

/// State shared between an [`EventLoop`](crate::pump::EventLoop) and the
/// [`ActiveEventLoop`] handles it gives to handlers.
pub(crate) struct LoopState {
    control_flow: Cell<ControlFlow>,
    exit_code: Cell<Option<i32>>,
    dispatching: Cell<bool>,
    reentered: Cell<bool>,
    native: Rc<RefCell<dyn NativeControl>>,
}

impl LoopState {
    pub(crate) fn new(native: Rc<RefCell<dyn NativeControl>>, control_flow: ControlFlow) -> Self {
        Self {
            control_flow: Cell::new(control_flow),
            exit_code: Cell::new(None),
            dispatching: Cell::new(false),
            reentered: Cell::new(false),
            native,
        }
    }

    pub(crate) fn control_flow(&self) -> ControlFlow {
        self.control_flow.get()
    }

    pub(crate) fn exit_code(&self) -> Option<i32> {
        self.exit_code.get()
    }

    /// Records an exit code. The first recorded code wins.
    pub(crate) fn record_exit(&self, code: i32) -> bool {
        if self.exit_code.get().is_some() {
            return false;
        }
        self.exit_code.set(Some(code));
        true
    }

    pub(crate) fn now(&self) -> Instant {
        self.native.borrow().now()
    }
}

/// Marks the loop as dispatching for as long as it lives.
pub(crate) struct DispatchGuard<'a> {
    state: &'a LoopState,
}

impl<'a> DispatchGuard<'a> {
    /// Returns `None` if a dispatch is already running on this loop. The
    /// running dispatch is then marked as re-entered so it fails too, even if
    /// the nested caller drops the error.
    pub(crate) fn enter(state: &'a LoopState) -> Option<Self> {
        if state.dispatching.replace(true) {
            state.reentered.set(true);
            return None;
        }
        state.reentered.set(false);
        Some(Self { state })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.state.dispatching.set(false);
    }
}

/// A handle to the running event loop, passed to every handler.
///
/// Cloning is cheap. Clones may be moved into suspended handler futures.
#[derive(Clone)]
pub struct ActiveEventLoop {
    state: Rc<LoopState>,
}

impl core::fmt::Debug for ActiveEventLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActiveEventLoop")
            .field("control_flow", &self.state.control_flow.get())
            .field("exit_code", &self.state.exit_code.get())
            .finish_non_exhaustive()
    }
}

impl ActiveEventLoop {
    pub(crate) fn new(state: Rc<LoopState>) -> Self {
        Self { state }
    }

    /// Returns and clears the re-entry mark left by a nested `pump`.
    pub(crate) fn take_reentry(&self) -> bool {
        self.state.reentered.replace(false)
    }

    /// Replaces the control flow for the next native wait.
    ///
    /// The slot is read once after the cycle's about-to-wait handler; if it
    /// is written several times in one cycle the last write wins.
    pub fn set_control_flow(&self, flow: ControlFlow) {
        self.state.control_flow.set(flow);
    }

    /// Shorthand for `set_control_flow(ControlFlow::Poll)`.
    pub fn set_control_flow_poll(&self) {
        self.set_control_flow(ControlFlow::Poll);
    }

    /// Shorthand for `set_control_flow(ControlFlow::Wait)`.
    pub fn set_control_flow_wait(&self) {
        self.set_control_flow(ControlFlow::Wait);
    }

    /// Waits until `timeout` past the native clock's current reading.
    pub fn set_control_flow_wait_until(&self, timeout: Duration) -> Result<(), TimeError> {
        let flow = ControlFlow::wait_duration(self.now(), timeout)?;
        self.set_control_flow(flow);
        Ok(())
    }

    /// Returns the current control flow.
    #[must_use]
    pub fn control_flow(&self) -> ControlFlow {
        self.state.control_flow()
    }

    /// Reads the native loop's clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.state.now()
    }

    /// Requests exit with code 0.
    pub fn exit(&self) {
        self.exit_with_code(0);
    }

    /// Requests exit with `code`.
    ///
    /// Only the first request is kept; later codes are ignored.
    pub fn exit_with_code(&self, code: i32) {
        if self.state.record_exit(code) {
            log::debug!("exit requested with code {code}");
            self.state.native.borrow_mut().request_exit(code);
        } else {
            log::warn!("ignoring exit code {code}, loop is already exiting");
        }
    }

    /// Returns `true` once an exit has been requested by the application or
    /// the platform.
    #[must_use]
    pub fn exiting(&self) -> bool {
        self.state.exit_code().is_some()
    }

    /// Creates a native window.
    pub fn create_window(&self, attributes: &WindowAttributes) -> Result<WindowId, NativeError> {
        self.state.native.borrow_mut().create_window(attributes)
    }

    /// Asks the platform to redraw `window_id`.
    pub fn request_redraw(&self, window_id: WindowId) {
        self.state.native.borrow_mut().request_redraw(window_id);
    }

    /// Chooses when raw device events are reported.
    pub fn listen_device_events(&self, filter: DeviceEvents) {
        self.state.native.borrow_mut().listen_device_events(filter);
    }
}
