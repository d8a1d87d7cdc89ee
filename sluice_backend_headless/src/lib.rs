// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless native backend for sluice.
//!
//! This crate provides an in-process [`NativeEventLoop`] with no display
//! connection:
//!
//! - Window registry with size constraints and focus tracking
//! - Redraw requests coalesced to one `RedrawRequested` per window per cycle
//! - Bounded, drop-oldest inbox fed by a cross-thread [`EventLoopProxy`]
//! - Monotonic or manually advanced [`Clock`]
//!
//! ```no_run
//! use sluice_backend_headless::{HeadlessConfig, HeadlessEventLoop};
//! use sluice_core::dispatch::CallbackDispatcher;
//! use sluice_core::pump::{EventLoop, PumpStatus};
//! use sluice_core::time::Duration;
//!
//! let native = HeadlessEventLoop::<String>::new(HeadlessConfig::default());
//! let proxy = native.create_proxy();
//! let event_loop = EventLoop::new(native);
//! let mut callbacks = CallbackDispatcher::direct()
//!     .on_user_event(|el, msg: String| if msg == "quit" { el.exit() });
//!
//! proxy.send_event("quit".to_string()).unwrap();
//! while let Ok(PumpStatus::Continue) =
//!     event_loop.pump(Some(Duration::from_millis(16)), &mut callbacks)
//! {}
//! ```

mod clock;
mod event_loop;
mod proxy;
mod queue;

pub use clock::{Clock, ManualClock};
pub use event_loop::{HeadlessConfig, HeadlessEventLoop, HeadlessWindow};
pub use proxy::{EventLoopClosed, EventLoopProxy};
pub use sluice_core::native::NativeEventLoop;
