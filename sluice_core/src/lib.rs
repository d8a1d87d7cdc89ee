// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded pump-once adapter for native windowing event loops.
//!
//! `sluice_core` lets a host that owns its own scheduler (an async runtime,
//! a game loop, an embedding VM) drive a platform event loop without
//! surrendering the thread. Each [`EventLoop::pump`](pump::EventLoop::pump)
//! call waits at most as long as the host allows, delivers whatever the
//! platform produced in a fixed order, and hands control back. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Host scheduler
//!       │  pump(host_timeout, &mut callbacks)
//!       ▼
//!   EventLoop ──► NativeEventLoop::pump_once(timeout) ──► NativeBatch
//!       │                                                     │
//!       │          ┌──────────────────────────────────────────┘
//!       │          ▼
//!       │   CallbackDispatcher (Direct | Suspendable)
//!       │          │ new_events ─► events ─► about_to_wait | exiting
//!       │          ▼
//!       │   ActiveEventLoop ──► ControlFlow slot, exit request,
//!       │                       NativeControl (windows, redraws)
//!       ▼
//!   PumpStatus::Continue | PumpStatus::Exit(code)
//! ```
//!
//! **[`time`]**: [`Duration`](time::Duration) and [`Instant`](time::Instant)
//! with checked arithmetic. Fallible constructors reject negative, NaN and
//! out-of-range values instead of panicking.
//!
//! **[`control_flow`]**: [`ControlFlow`](control_flow::ControlFlow) (how
//! the next native wait behaves) and [`StartCause`](control_flow::StartCause)
//! (why a cycle woke up).
//!
//! **[`pump`]**: The adapter itself. Guards against re-entrant pumping and
//! makes exit terminal and idempotent.
//!
//! **[`dispatch`]**: The application's handler table and the rules for
//! invoking it, including suspended handlers.
//!
//! **[`active`]**: [`ActiveEventLoop`](active::ActiveEventLoop), the
//! handle every handler receives.
//!
//! **[`native`]**: The [`NativeEventLoop`](native::NativeEventLoop) trait
//! platform backends implement.
//!
//! **[`event`]**: The native event vocabulary and window attributes.
//!
//! **[`config`]**: Loop configuration presets.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pump-loop instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Reads the monotonic clock for
//!   [`Instant::now`](time::Instant::now) and enables the process-clock
//!   `sleep` and `sleep_until` functions.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod active;
pub mod config;
pub mod control_flow;
pub mod dispatch;
pub mod event;
pub mod native;
pub mod pump;
pub mod sleep;
pub mod time;
pub mod trace;
