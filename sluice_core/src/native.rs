// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow interface to the native windowing collaborator.
//!
//! A platform backend implements [`NativeEventLoop`]: one bounded
//! [`pump_once`](NativeEventLoop::pump_once) call per pump cycle that
//! returns an ordered [`NativeBatch`]. Everything else a handler may ask of
//! the platform goes through [`NativeControl`], whose calls are forwarded
//! verbatim and never buffered by the core.

use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::event::{DeviceEvents, NativeEvent, WindowAttributes, WindowId};
use crate::time::{Duration, Instant};

/// Errors reported by a native collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NativeError {
    /// The platform refused to create a window.
    #[error("window creation failed: {0}")]
    WindowCreation(String),
    /// The window id is not known to the native loop.
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),
    /// The native loop has been torn down.
    #[error("native event loop is closed")]
    Closed,
}

/// Native status reported alongside each batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeStatus {
    /// The native loop keeps running.
    Continue,
    /// The native loop is shutting down with the given code.
    Exit(i32),
}

/// The result of one bounded native pump.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeBatch<T> {
    /// Whether the native side is shutting down.
    pub status: NativeStatus,
    /// Events in native delivery order.
    pub events: Vec<NativeEvent<T>>,
}

impl<T> NativeBatch<T> {
    /// An empty batch with [`NativeStatus::Continue`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            status: NativeStatus::Continue,
            events: Vec::new(),
        }
    }
}

/// Fire-and-forget requests handlers may make of the platform.
///
/// Handlers reach these through
/// [`ActiveEventLoop`](crate::active::ActiveEventLoop).
pub trait NativeControl {
    /// Reads the clock the native loop uses for its waits.
    fn now(&self) -> Instant;

    /// Creates a window and returns its id.
    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<WindowId, NativeError>;

    /// Asks for a [`RedrawRequested`](crate::event::WindowEvent::RedrawRequested)
    /// on the given window.
    fn request_redraw(&mut self, window_id: WindowId);

    /// Tells the platform the application wants to exit with `code`.
    fn request_exit(&mut self, code: i32);

    /// Chooses when raw device events are reported.
    fn listen_device_events(&mut self, filter: DeviceEvents);
}

/// A native event source that can be pumped once with a bounded timeout.
///
/// `T` is the user-event payload type.
pub trait NativeEventLoop<T>: NativeControl {
    /// Waits at most `timeout` (`None` is unbounded) for native work and
    /// returns up to `max_events` events in delivery order.
    ///
    /// Must return as soon as at least one event is available.
    fn pump_once(
        &mut self,
        timeout: Option<Duration>,
        max_events: usize,
    ) -> Result<NativeBatch<T>, NativeError>;

    /// Releases native resources. Called exactly once, after the exiting
    /// handler has run.
    fn teardown(&mut self);
}
