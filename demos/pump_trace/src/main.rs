// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-driven pump loop that exercises the tracing and diagnostics pipeline.
//!
//! A simulated host scheduler owns the thread and calls `pump` with a 16 ms
//! budget between its own frames. A producer thread feeds user events through
//! an `EventLoopProxy`. The loop runs twice, once with direct handlers and
//! once with suspendable ones, recording to both a
//! [`PrettyPrintSink`](sluice_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](sluice_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file.

use std::cell::Cell;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;
use std::thread;

use sluice_backend_headless::{EventLoopProxy, HeadlessConfig, HeadlessEventLoop};
use sluice_core::dispatch::{CallbackDispatcher, HandlerReply};
use sluice_core::event::{WindowAttributes, WindowEvent};
use sluice_core::pump::{EventLoop, PumpStatus};
use sluice_core::sleep::sleep;
use sluice_core::time::{Duration, TimeError};
use sluice_core::trace::{
    CycleBeginEvent, CycleEndEvent, ExitEvent, HandlerBeginEvent, HandlerEndEvent,
    HandlerSuspendedEvent, TraceSink, Tracer,
};

use sluice_debug::pretty::PrettyPrintSink;
use sluice_debug::recorder::RecorderSink;

const TICKS: u32 = 5;
const HOST_BUDGET: Duration = Duration::from_millis(16);

/// Forwards every event to both sinks.
#[derive(Debug)]
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_cycle_begin(&mut self, e: &CycleBeginEvent) {
        self.pretty.on_cycle_begin(e);
        self.recorder.on_cycle_begin(e);
    }

    fn on_handler_begin(&mut self, e: &HandlerBeginEvent) {
        self.pretty.on_handler_begin(e);
        self.recorder.on_handler_begin(e);
    }

    fn on_handler_end(&mut self, e: &HandlerEndEvent) {
        self.pretty.on_handler_end(e);
        self.recorder.on_handler_end(e);
    }

    fn on_handler_suspended(&mut self, e: &HandlerSuspendedEvent) {
        self.pretty.on_handler_suspended(e);
        self.recorder.on_handler_suspended(e);
    }

    fn on_cycle_end(&mut self, e: &CycleEndEvent) {
        self.pretty.on_cycle_end(e);
        self.recorder.on_cycle_end(e);
    }

    fn on_exit(&mut self, e: &ExitEvent) {
        self.pretty.on_exit(e);
        self.recorder.on_exit(e);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut tee = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    println!("== direct handlers ==");
    let code = run(direct_callbacks(), &mut tee)?;
    println!("direct loop exited with {code}");

    println!("== suspendable handlers ==");
    let code = run(suspendable_callbacks(), &mut tee)?;
    println!("suspendable loop exited with {code}");

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    sluice_debug::chrome::export(tee.recorder.as_bytes(), &mut writer)?;
    println!("Wrote {path}");
    Ok(())
}

/// Drives one loop to completion from a host-style scheduler.
fn run(
    mut callbacks: CallbackDispatcher<u32>,
    sink: &mut dyn TraceSink,
) -> Result<i32, Box<dyn Error>> {
    let native = HeadlessEventLoop::new(HeadlessConfig::new());
    let producer = spawn_producer(native.create_proxy());
    let event_loop = EventLoop::new(native);
    let mut tracer = Tracer::new(sink);

    let mut host_frames = 0_u32;
    let code = loop {
        match event_loop.pump_traced(Some(HOST_BUDGET), &mut callbacks, &mut tracer)? {
            PumpStatus::Continue => {
                // Stand-in for the host's own frame work.
                thread::sleep(std::time::Duration::from_millis(1));
                host_frames += 1;
            }
            PumpStatus::Exit(code) => break code,
        }
    };
    producer
        .join()
        .map_err(|_| "producer thread panicked")?;
    println!("host ran {host_frames} frames between pumps");
    Ok(code)
}

fn spawn_producer(proxy: EventLoopProxy<u32>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for tick in 1..=TICKS {
            thread::sleep(std::time::Duration::from_millis(10));
            if proxy.send_event(tick).is_err() {
                return;
            }
        }
    })
}

/// Opens a window, redraws it on every tick and exits after the last one.
fn direct_callbacks() -> CallbackDispatcher<u32> {
    let window = Rc::new(Cell::new(None));
    let (on_resume, on_tick) = (window.clone(), window);
    CallbackDispatcher::direct()
        .on_resumed(move |el| {
            let id = el.create_window(&WindowAttributes::default().with_title("pump_trace"))?;
            on_resume.set(Some(id));
            Ok::<(), Box<dyn Error>>(())
        })
        .on_user_event(move |el, tick| {
            if let Some(id) = on_tick.get() {
                el.request_redraw(id);
            }
            if tick == TICKS {
                el.exit_with_code(0);
            }
        })
        .on_window_event(|_, id, event| {
            if event == WindowEvent::RedrawRequested {
                println!("  redraw window {}", id.0);
            }
        })
        .on_about_to_wait(|el| el.set_control_flow_wait_until(Duration::from_millis(50)))
}

/// Each tick does some asynchronous work before the next one is dispatched.
fn suspendable_callbacks() -> CallbackDispatcher<u32> {
    CallbackDispatcher::suspendable().on_user_event(|el, tick| {
        let el = el.clone();
        HandlerReply::suspend(async move {
            sleep(Duration::from_millis(3))?.await;
            println!("  tick {tick} processed");
            if tick == TICKS {
                el.exit_with_code(i32::try_from(tick).unwrap_or(i32::MAX));
            }
            Ok::<(), TimeError>(())
        })
    })
}
