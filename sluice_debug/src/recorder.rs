// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Instants and durations are stored as whole seconds (`u64`) followed by
//! nanoseconds (`u32`).

use std::iter::FusedIterator;

use sluice_core::control_flow::{ControlFlow, StartCause};
use sluice_core::dispatch::HandlerKind;
use sluice_core::time::{Duration, Instant};
use sluice_core::trace::{
    CycleBeginEvent, CycleEndEvent, ExitEvent, HandlerBeginEvent, HandlerEndEvent,
    HandlerOutcome, HandlerSuspendedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CYCLE_BEGIN: u8 = 1;
const TAG_HANDLER_BEGIN: u8 = 2;
const TAG_HANDLER_END: u8 = 3;
const TAG_HANDLER_SUSPENDED: u8 = 4;
const TAG_CYCLE_END: u8 = 5;
const TAG_EXIT: u8 = 6;

const HANDLER_KINDS: [HandlerKind; 9] = [
    HandlerKind::NewEvents,
    HandlerKind::Resumed,
    HandlerKind::WindowEvent,
    HandlerKind::DeviceEvent,
    HandlerKind::UserEvent,
    HandlerKind::Suspended,
    HandlerKind::AboutToWait,
    HandlerKind::Exiting,
    HandlerKind::MemoryWarning,
];

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_duration(&mut self, d: Duration) {
        self.write_u64(d.as_secs());
        self.write_u32(d.subsec_nanos());
    }

    fn write_instant(&mut self, t: Instant) {
        self.write_duration(t.offset());
    }

    fn write_option_instant(&mut self, t: Option<Instant>) {
        self.write_u8(u8::from(t.is_some()));
        self.write_instant(t.unwrap_or(Instant::ZERO));
    }

    fn write_option_duration(&mut self, d: Option<Duration>) {
        self.write_u8(u8::from(d.is_some()));
        self.write_duration(d.unwrap_or(Duration::ZERO));
    }

    fn write_handler(&mut self, handler: HandlerKind) {
        let code = HANDLER_KINDS
            .iter()
            .position(|&k| k == handler)
            .unwrap_or_default();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "handler table has fewer than 256 entries"
        )]
        self.write_u8(code as u8);
    }

    fn write_cause(&mut self, cause: StartCause) {
        match cause {
            StartCause::Init => self.write_u8(0),
            StartCause::Poll => self.write_u8(1),
            StartCause::ResumeTimeReached {
                start,
                requested_resume,
            } => {
                self.write_u8(2);
                self.write_instant(start);
                self.write_instant(requested_resume);
            }
            StartCause::WaitCancelled {
                start,
                requested_resume,
            } => {
                self.write_u8(3);
                self.write_instant(start);
                self.write_option_instant(requested_resume);
            }
        }
    }

    fn write_control_flow(&mut self, flow: ControlFlow) {
        match flow {
            ControlFlow::Poll => self.write_u8(0),
            ControlFlow::Wait => self.write_u8(1),
            ControlFlow::WaitUntil(deadline) => {
                self.write_u8(2);
                self.write_instant(deadline);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_cycle_begin(&mut self, e: &CycleBeginEvent) {
        self.write_u8(TAG_CYCLE_BEGIN);
        self.write_u64(e.cycle_index);
        self.write_cause(e.cause);
        self.write_option_duration(e.timeout);
        self.write_u32(e.batch_len);
        self.write_instant(e.timestamp);
    }

    fn on_handler_begin(&mut self, e: &HandlerBeginEvent) {
        self.write_u8(TAG_HANDLER_BEGIN);
        self.write_u64(e.cycle_index);
        self.write_handler(e.handler);
        self.write_instant(e.timestamp);
    }

    fn on_handler_end(&mut self, e: &HandlerEndEvent) {
        self.write_u8(TAG_HANDLER_END);
        self.write_u64(e.cycle_index);
        self.write_handler(e.handler);
        self.write_u8(u8::from(e.outcome == HandlerOutcome::Failed));
        self.write_instant(e.timestamp);
    }

    fn on_handler_suspended(&mut self, e: &HandlerSuspendedEvent) {
        self.write_u8(TAG_HANDLER_SUSPENDED);
        self.write_u64(e.cycle_index);
        self.write_handler(e.handler);
        self.write_instant(e.timestamp);
    }

    fn on_cycle_end(&mut self, e: &CycleEndEvent) {
        self.write_u8(TAG_CYCLE_END);
        self.write_u64(e.cycle_index);
        self.write_u32(e.events_dispatched);
        self.write_control_flow(e.control_flow);
        self.write_u8(u8::from(e.aborted));
        self.write_instant(e.timestamp);
    }

    fn on_exit(&mut self, e: &ExitEvent) {
        self.write_u8(TAG_EXIT);
        self.write_i32(e.code);
        self.write_instant(e.timestamp);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`CycleBeginEvent`].
    CycleBegin(CycleBeginEvent),
    /// A [`HandlerBeginEvent`].
    HandlerBegin(HandlerBeginEvent),
    /// A [`HandlerEndEvent`].
    HandlerEnd(HandlerEndEvent),
    /// A [`HandlerSuspendedEvent`].
    HandlerSuspended(HandlerSuspendedEvent),
    /// A [`CycleEndEvent`].
    CycleEnd(CycleEndEvent),
    /// An [`ExitEvent`].
    Exit(ExitEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Iteration stops at the first truncated record or unknown tag.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_duration(&mut self) -> Option<Duration> {
        let secs = self.read_u64()?;
        let nanos = self.read_u32()?;
        Duration::new(secs, nanos).ok()
    }

    fn read_instant(&mut self) -> Option<Instant> {
        self.read_duration().map(Instant::from_offset)
    }

    fn read_option_instant(&mut self) -> Option<Option<Instant>> {
        let present = self.read_u8()?;
        let t = self.read_instant()?;
        Some((present != 0).then_some(t))
    }

    fn read_option_duration(&mut self) -> Option<Option<Duration>> {
        let present = self.read_u8()?;
        let d = self.read_duration()?;
        Some((present != 0).then_some(d))
    }

    fn read_handler(&mut self) -> Option<HandlerKind> {
        HANDLER_KINDS.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_cause(&mut self) -> Option<StartCause> {
        Some(match self.read_u8()? {
            0 => StartCause::Init,
            1 => StartCause::Poll,
            2 => StartCause::ResumeTimeReached {
                start: self.read_instant()?,
                requested_resume: self.read_instant()?,
            },
            3 => StartCause::WaitCancelled {
                start: self.read_instant()?,
                requested_resume: self.read_option_instant()?,
            },
            _ => return None,
        })
    }

    fn read_control_flow(&mut self) -> Option<ControlFlow> {
        Some(match self.read_u8()? {
            0 => ControlFlow::Poll,
            1 => ControlFlow::Wait,
            2 => ControlFlow::WaitUntil(self.read_instant()?),
            _ => return None,
        })
    }

    fn decode_cycle_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CycleBegin(CycleBeginEvent {
            cycle_index: self.read_u64()?,
            cause: self.read_cause()?,
            timeout: self.read_option_duration()?,
            batch_len: self.read_u32()?,
            timestamp: self.read_instant()?,
        }))
    }

    fn decode_handler_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::HandlerBegin(HandlerBeginEvent {
            cycle_index: self.read_u64()?,
            handler: self.read_handler()?,
            timestamp: self.read_instant()?,
        }))
    }

    fn decode_handler_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::HandlerEnd(HandlerEndEvent {
            cycle_index: self.read_u64()?,
            handler: self.read_handler()?,
            outcome: if self.read_u8()? != 0 {
                HandlerOutcome::Failed
            } else {
                HandlerOutcome::Completed
            },
            timestamp: self.read_instant()?,
        }))
    }

    fn decode_handler_suspended(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::HandlerSuspended(HandlerSuspendedEvent {
            cycle_index: self.read_u64()?,
            handler: self.read_handler()?,
            timestamp: self.read_instant()?,
        }))
    }

    fn decode_cycle_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CycleEnd(CycleEndEvent {
            cycle_index: self.read_u64()?,
            events_dispatched: self.read_u32()?,
            control_flow: self.read_control_flow()?,
            aborted: self.read_u8()? != 0,
            timestamp: self.read_instant()?,
        }))
    }

    fn decode_exit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Exit(ExitEvent {
            code: self.read_i32()?,
            timestamp: self.read_instant()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let event = match tag {
            TAG_CYCLE_BEGIN => self.decode_cycle_begin(),
            TAG_HANDLER_BEGIN => self.decode_handler_begin(),
            TAG_HANDLER_END => self.decode_handler_end(),
            TAG_HANDLER_SUSPENDED => self.decode_handler_suspended(),
            TAG_CYCLE_END => self.decode_cycle_end(),
            TAG_EXIT => self.decode_exit(),
            _ => None,
        };
        if event.is_none() {
            // Never resume in the middle of a bad record.
            self.pos = self.data.len();
        }
        event
    }
}

impl FusedIterator for DecodeIter<'_> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
