// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use sluice_core::control_flow::ControlFlow;
use sluice_core::time::Instant;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Cycles and handler invocations become nested duration slices; suspensions
/// and the final exit are instant events. Timestamps are microseconds on the
/// native clock.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::CycleBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": "cycle",
                    "cat": "Pump",
                    "ts": instant_us(e.timestamp),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "cycle_index": e.cycle_index,
                        "cause": e.cause.name(),
                        "timeout_us": e.timeout.map(|t| nanos_to_us(t.as_nanos())),
                        "batch_len": e.batch_len,
                    }
                }));
            }
            RecordedEvent::HandlerBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": e.handler.name(),
                    "cat": "Handler",
                    "ts": instant_us(e.timestamp),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "cycle_index": e.cycle_index,
                    }
                }));
            }
            RecordedEvent::HandlerEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": e.handler.name(),
                    "cat": "Handler",
                    "ts": instant_us(e.timestamp),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "cycle_index": e.cycle_index,
                        "outcome": format!("{:?}", e.outcome),
                    }
                }));
            }
            RecordedEvent::HandlerSuspended(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "suspended",
                    "cat": "Handler",
                    "ts": instant_us(e.timestamp),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "cycle_index": e.cycle_index,
                        "handler": e.handler.name(),
                    }
                }));
            }
            RecordedEvent::CycleEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": "cycle",
                    "cat": "Pump",
                    "ts": instant_us(e.timestamp),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "cycle_index": e.cycle_index,
                        "events_dispatched": e.events_dispatched,
                        "control_flow": flow_name(e.control_flow),
                        "aborted": e.aborted,
                    }
                }));
            }
            RecordedEvent::Exit(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "exit",
                    "cat": "Pump",
                    "ts": instant_us(e.timestamp),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "code": e.code,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant_us(t: Instant) -> f64 {
    nanos_to_us(t.offset().as_nanos())
}

fn nanos_to_us(nanos: u128) -> f64 {
    nanos as f64 / 1000.0
}

fn flow_name(flow: ControlFlow) -> &'static str {
    match flow {
        ControlFlow::Poll => "Poll",
        ControlFlow::Wait => "Wait",
        ControlFlow::WaitUntil(_) => "WaitUntil",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use sluice_core::control_flow::StartCause;
    use sluice_core::dispatch::HandlerKind;
    use sluice_core::time::Duration;
    use sluice_core::trace::{
        CycleBeginEvent, CycleEndEvent, ExitEvent, HandlerBeginEvent, HandlerEndEvent,
        HandlerOutcome, TraceSink,
    };

    fn at(micros: u64) -> Instant {
        Instant::from_offset(Duration::from_micros(micros))
    }

    #[test]
    fn export_produces_nested_slices() {
        let mut rec = RecorderSink::new();
        rec.on_cycle_begin(&CycleBeginEvent {
            cycle_index: 0,
            cause: StartCause::Init,
            timeout: Some(Duration::ZERO),
            batch_len: 0,
            timestamp: at(1_000),
        });
        rec.on_handler_begin(&HandlerBeginEvent {
            cycle_index: 0,
            handler: HandlerKind::NewEvents,
            timestamp: at(1_000),
        });
        rec.on_handler_end(&HandlerEndEvent {
            cycle_index: 0,
            handler: HandlerKind::NewEvents,
            outcome: HandlerOutcome::Completed,
            timestamp: at(1_250),
        });
        rec.on_cycle_end(&CycleEndEvent {
            cycle_index: 0,
            events_dispatched: 0,
            control_flow: ControlFlow::Wait,
            aborted: false,
            timestamp: at(1_300),
        });
        rec.on_exit(&ExitEvent {
            code: 2,
            timestamp: at(1_300),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 5);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "cycle");
        assert_eq!(parsed[0]["args"]["cause"], "Init");

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "new_events");
        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 1250.0);

        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[3]["args"]["control_flow"], "Wait");

        assert_eq!(parsed[4]["ph"], "i");
        assert_eq!(parsed[4]["args"]["code"], 2);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
