// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end pump cycles against the headless backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;

use sluice_backend_headless::{Clock, HeadlessConfig, HeadlessEventLoop, ManualClock};
use sluice_core::config::EventLoopConfig;
use sluice_core::control_flow::StartCause;
use sluice_core::dispatch::{CallbackDispatcher, HandlerReply};
use sluice_core::event::{WindowAttributes, WindowEvent, WindowId};
use sluice_core::pump::{EventLoop, PumpStatus};
use sluice_core::sleep::sleep;
use sluice_core::time::{Duration, Instant, TimeError};

const BUDGET: Option<Duration> = Some(Duration::from_millis(5));

fn manual_loop<T: 'static>() -> (EventLoop<HeadlessEventLoop<T>, T>, ManualClock) {
    let clock = ManualClock::new(Instant::from_offset(Duration::from_secs(1)));
    let native = HeadlessEventLoop::with_clock(HeadlessConfig::new(), Clock::Manual(clock.clone()));
    (EventLoop::new(native), clock)
}

#[test]
fn wait_without_events_keeps_returning_continue() {
    let event_loop = EventLoop::new(HeadlessEventLoop::<()>::default());
    let causes = Rc::new(RefCell::new(Vec::new()));
    let sink = causes.clone();
    let mut callbacks =
        CallbackDispatcher::direct().on_new_events(move |_, cause| sink.borrow_mut().push(cause));

    for _ in 0..3 {
        assert_eq!(
            event_loop.pump(BUDGET, &mut callbacks).unwrap(),
            PumpStatus::Continue
        );
    }
    let causes = causes.borrow();
    assert_eq!(causes[0], StartCause::Init);
    assert!(
        matches!(
            causes[2],
            StartCause::WaitCancelled {
                requested_resume: None,
                ..
            }
        ),
        "got {:?}",
        causes[2]
    );
}

#[test]
fn platform_exit_is_terminal() {
    let native = HeadlessEventLoop::<()>::default();
    let proxy = native.create_proxy();
    let event_loop = EventLoop::new(native);
    let exiting = Rc::new(Cell::new(0));
    let count = exiting.clone();
    let mut callbacks = CallbackDispatcher::direct().on_exiting(move |_| count.set(count.get() + 1));

    assert_eq!(
        event_loop.pump(BUDGET, &mut callbacks).unwrap(),
        PumpStatus::Continue
    );
    proxy.request_exit(7).unwrap();
    for _ in 0..3 {
        assert_eq!(
            event_loop.pump(BUDGET, &mut callbacks).unwrap(),
            PumpStatus::Exit(7)
        );
    }
    assert_eq!(exiting.get(), 1, "exiting runs once");
    assert!(event_loop.native().is_closed(), "teardown ran");
    assert!(proxy.send_event(()).is_err(), "proxies see the closed loop");
}

#[test]
fn application_exit_code_is_returned() {
    let event_loop = EventLoop::new(HeadlessEventLoop::<()>::default());
    let mut callbacks = CallbackDispatcher::direct().on_about_to_wait(|el| el.exit_with_code(3));
    assert_eq!(
        event_loop.pump(BUDGET, &mut callbacks).unwrap(),
        PumpStatus::Exit(3)
    );
    assert_eq!(event_loop.exit_code(), Some(3));
}

#[test]
fn user_events_from_another_thread_arrive_in_order() {
    let native = HeadlessEventLoop::<u32>::default();
    let proxy = native.create_proxy();
    let event_loop = EventLoop::new(native);
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    let mut callbacks = CallbackDispatcher::direct().on_user_event(move |el, n| {
        sink.borrow_mut().push(n);
        if n == 9 {
            el.exit();
        }
    });

    let sender = thread::spawn(move || {
        for n in 0..10 {
            proxy.send_event(n).unwrap();
        }
    });
    let mut status = PumpStatus::Continue;
    for _ in 0..1_000 {
        status = event_loop
            .pump(Some(Duration::from_millis(20)), &mut callbacks)
            .unwrap();
        if status != PumpStatus::Continue {
            break;
        }
    }
    sender.join().unwrap();

    assert_eq!(status, PumpStatus::Exit(0));
    assert_eq!(*received.borrow(), (0..10).collect::<Vec<_>>());
}

#[test]
fn suspended_handlers_complete_in_dispatch_order() {
    let native = HeadlessEventLoop::<(u32, u64)>::default();
    let proxy = native.create_proxy();
    let event_loop = EventLoop::new(native);
    let done = Rc::new(RefCell::new(Vec::new()));
    let sink = done.clone();
    let mut callbacks = CallbackDispatcher::suspendable()
        .on_user_event(move |_, (id, millis): (u32, u64)| {
            let sink = sink.clone();
            HandlerReply::suspend(async move {
                sleep(Duration::from_millis(millis))?.await;
                sink.borrow_mut().push(id);
                Ok::<(), TimeError>(())
            })
        })
        .on_about_to_wait(|el| {
            el.set_control_flow_poll();
        });

    // The slow handler is dispatched first and must finish first.
    proxy.send_event((1, 20)).unwrap();
    proxy.send_event((2, 1)).unwrap();
    let give_up = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while done.borrow().len() < 2 && std::time::Instant::now() < give_up {
        event_loop
            .pump(Some(Duration::from_millis(1)), &mut callbacks)
            .unwrap();
    }
    assert_eq!(*done.borrow(), [1, 2]);
}

#[test]
fn loop_sleep_waits_for_the_manual_clock() {
    let (event_loop, clock) = manual_loop::<u32>();
    let proxy = event_loop.native().create_proxy();
    let woke = Rc::new(Cell::new(false));
    let flag = woke.clone();
    let mut callbacks = CallbackDispatcher::suspendable().on_user_event(move |el, _: u32| {
        let (el, flag) = (el.clone(), flag.clone());
        HandlerReply::suspend(async move {
            el.sleep(Duration::from_millis(250))?.await;
            flag.set(true);
            Ok::<(), TimeError>(())
        })
    });

    proxy.send_event(1).unwrap();
    for _ in 0..3 {
        event_loop.pump(BUDGET, &mut callbacks).unwrap();
    }
    assert!(!woke.get(), "manual clock has not reached the deadline");

    clock.advance(Duration::from_millis(250)).unwrap();
    event_loop.pump(BUDGET, &mut callbacks).unwrap();
    assert!(woke.get(), "sleep resolves on the loop clock");
}

#[test]
fn wait_until_resumes_at_deadline_on_manual_clock() {
    let (event_loop, clock) = manual_loop::<()>();
    let causes = Rc::new(RefCell::new(Vec::new()));
    let sink = causes.clone();
    let mut callbacks = CallbackDispatcher::direct()
        .on_new_events(move |_, cause| sink.borrow_mut().push(cause))
        .on_about_to_wait(|el| el.set_control_flow_wait_until(Duration::from_millis(100)));

    event_loop.pump(None, &mut callbacks).unwrap();
    let deadline = event_loop.control_flow().deadline().unwrap();
    event_loop.pump(None, &mut callbacks).unwrap();

    assert_eq!(clock.now(), deadline);
    assert!(
        matches!(
            causes.borrow()[1],
            StartCause::ResumeTimeReached { requested_resume, .. } if requested_resume == deadline
        ),
        "got {:?}",
        causes.borrow()[1]
    );
}

#[test]
fn host_budget_bounds_manual_wait() {
    let (event_loop, clock) = manual_loop::<()>();
    let mut callbacks = CallbackDispatcher::direct()
        .on_about_to_wait(|el| el.set_control_flow_wait_until(Duration::from_secs(60)));

    event_loop.pump(None, &mut callbacks).unwrap();
    let before = clock.now();
    event_loop
        .pump(Some(Duration::from_millis(16)), &mut callbacks)
        .unwrap();
    assert_eq!(
        clock.now().checked_duration_since(before),
        Ok(Duration::from_millis(16))
    );
}

#[test]
fn window_created_on_resume_gets_one_redraw_per_cycle() {
    let (event_loop, _clock) = manual_loop::<()>();
    let window = Rc::new(Cell::new(None::<WindowId>));
    let redraws = Rc::new(Cell::new(0));
    let (slot, count) = (window.clone(), redraws.clone());
    let mut callbacks = CallbackDispatcher::direct()
        .on_resumed(move |el| {
            let id = el.create_window(&WindowAttributes::default().with_title("main"))?;
            el.request_redraw(id);
            el.request_redraw(id);
            slot.set(Some(id));
            Ok::<(), sluice_core::native::NativeError>(())
        })
        .on_window_event(move |_, _, event| {
            if event == WindowEvent::RedrawRequested {
                count.set(count.get() + 1);
            }
        });

    event_loop.pump(BUDGET, &mut callbacks).unwrap();
    assert_eq!(redraws.get(), 0, "window did not exist when the batch was taken");
    event_loop.pump(BUDGET, &mut callbacks).unwrap();
    assert_eq!(redraws.get(), 1);

    let id = window.get().unwrap();
    let native = event_loop.native();
    let created = native.window(id).unwrap();
    assert_eq!(created.attributes().title, "main");
    assert_eq!(created.size(), native.config().default_window_size);
}

#[test]
fn batch_limit_spreads_events_over_cycles() {
    let config = EventLoopConfig::on_demand().with_max_batch_len(2);
    let native = HeadlessEventLoop::<u32>::default();
    let proxy = native.create_proxy();
    let event_loop = EventLoop::with_config(native, config);
    let per_cycle = Rc::new(RefCell::new(vec![0_u32]));
    let (on_event, on_cycle) = (per_cycle.clone(), per_cycle.clone());
    let mut callbacks = CallbackDispatcher::direct()
        .on_user_event(move |_, _| *on_event.borrow_mut().last_mut().unwrap() += 1)
        .on_about_to_wait(move |_| on_cycle.borrow_mut().push(0));

    event_loop.pump(BUDGET, &mut callbacks).unwrap();
    for n in 0..5 {
        proxy.send_event(n).unwrap();
    }
    for _ in 0..3 {
        event_loop.pump(BUDGET, &mut callbacks).unwrap();
    }
    assert_eq!(per_cycle.borrow()[1..4], [2, 2, 1]);
}

#[test]
fn full_inbox_evicts_oldest_events() {
    let native = HeadlessEventLoop::<u32>::new(HeadlessConfig::new().with_queue_capacity(2));
    let proxy = native.create_proxy();
    let event_loop = EventLoop::new(native);
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    let mut callbacks =
        CallbackDispatcher::direct().on_user_event(move |_, n| sink.borrow_mut().push(n));

    for n in 1..=3 {
        proxy.send_event(n).unwrap();
    }
    event_loop.pump(BUDGET, &mut callbacks).unwrap();
    assert_eq!(*received.borrow(), [2, 3]);
    assert_eq!(event_loop.native().dropped_events(), 1);
}
