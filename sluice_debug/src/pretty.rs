// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are seconds on the native clock.

use std::io::Write;

use sluice_core::control_flow::ControlFlow;
use sluice_core::time::{Duration, Instant};
use sluice_core::trace::{
    CycleBeginEvent, CycleEndEvent, ExitEvent, HandlerBeginEvent, HandlerEndEvent,
    HandlerOutcome, HandlerSuspendedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn secs(t: Instant) -> f64 {
    t.offset().as_secs_f64()
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn flow(flow: ControlFlow) -> String {
    match flow {
        ControlFlow::Poll => "poll".into(),
        ControlFlow::Wait => "wait".into(),
        ControlFlow::WaitUntil(deadline) => format!("wait-until {:.6}s", secs(deadline)),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_cycle_begin(&mut self, e: &CycleBeginEvent) {
        let timeout = match e.timeout {
            Some(d) => format!("{:.3}ms", millis(d)),
            None => "unbounded".into(),
        };
        let _ = writeln!(
            self.writer,
            "[cycle] #{} cause={} timeout={timeout} events={} at {:.6}s",
            e.cycle_index,
            e.cause.name(),
            e.batch_len,
            secs(e.timestamp),
        );
    }

    fn on_handler_begin(&mut self, e: &HandlerBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[handler:begin] #{} {} at {:.6}s",
            e.cycle_index,
            e.handler,
            secs(e.timestamp),
        );
    }

    fn on_handler_end(&mut self, e: &HandlerEndEvent) {
        let outcome = match e.outcome {
            HandlerOutcome::Completed => "ok",
            HandlerOutcome::Failed => "FAILED",
        };
        let _ = writeln!(
            self.writer,
            "[handler:end] #{} {} {outcome} at {:.6}s",
            e.cycle_index,
            e.handler,
            secs(e.timestamp),
        );
    }

    fn on_handler_suspended(&mut self, e: &HandlerSuspendedEvent) {
        let _ = writeln!(
            self.writer,
            "[handler:suspended] #{} {} at {:.6}s",
            e.cycle_index,
            e.handler,
            secs(e.timestamp),
        );
    }

    fn on_cycle_end(&mut self, e: &CycleEndEvent) {
        let status = if e.aborted { "ABORTED" } else { "done" };
        let _ = writeln!(
            self.writer,
            "[cycle:end] #{} {status} dispatched={} next={}",
            e.cycle_index,
            e.events_dispatched,
            flow(e.control_flow),
        );
    }

    fn on_exit(&mut self, e: &ExitEvent) {
        let _ = writeln!(
            self.writer,
            "[exit] code={} at {:.6}s",
            e.code,
            secs(e.timestamp),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::control_flow::StartCause;
    use sluice_core::dispatch::HandlerKind;

    #[test]
    fn pretty_print_cycle() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_cycle_begin(&CycleBeginEvent {
            cycle_index: 1,
            cause: StartCause::Poll,
            timeout: None,
            batch_len: 3,
            timestamp: Instant::from_offset(Duration::from_secs(2)),
        });
        sink.on_cycle_end(&CycleEndEvent {
            cycle_index: 1,
            events_dispatched: 3,
            control_flow: ControlFlow::Poll,
            aborted: true,
            timestamp: Instant::from_offset(Duration::from_secs(2)),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[cycle] #1 cause=Poll timeout=unbounded events=3"), "got: {output}");
        assert!(output.contains("ABORTED"), "got: {output}");
    }

    #[test]
    fn pretty_print_failed_handler() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_handler_end(&HandlerEndEvent {
            cycle_index: 0,
            handler: HandlerKind::WindowEvent,
            outcome: HandlerOutcome::Failed,
            timestamp: Instant::ZERO,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("window_event FAILED"), "got: {output}");
    }
}
