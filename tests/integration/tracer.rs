//! Tracer integration tests
//!
//! Tracers observe every dispatch and failure, can be swapped while a
//! drain is in flight, and never take the engine down with them.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use cmdchain::{
    action_fn, ActionError, BoundAction, EngineConfig, ExecError, ExecutionContext, Frame,
    QueueEntry, RunState, Tracer,
};

#[derive(Default)]
struct Counting {
    executes: AtomicU32,
    errors: AtomicU32,
}

impl Tracer for Counting {
    fn before_execute(&self, _frame: &Frame) {
        self.executes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _frame: &Frame, _error: &ExecError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

struct DepthRecorder {
    depths: Mutex<Vec<u32>>,
}

impl Tracer for DepthRecorder {
    fn before_execute(&self, frame: &Frame) {
        self.depths.lock().unwrap().push(frame.depth());
    }

    fn on_error(&self, _frame: &Frame, _error: &ExecError) {}
}

struct Panicking;

impl Tracer for Panicking {
    fn before_execute(&self, _frame: &Frame) {
        panic!("hook blew up");
    }

    fn on_error(&self, _frame: &Frame, _error: &ExecError) {
        panic!("hook blew up");
    }
}

fn seed_ok(ctx: &mut ExecutionContext<String>) {
    ctx.queue_next(QueueEntry::new(
        ctx.root_frame(),
        BoundAction::new("server".to_string(), action_fn(|_: &String, _| Ok(()))),
    ));
}

fn seed_failing(ctx: &mut ExecutionContext<String>) {
    ctx.queue_next(QueueEntry::new(
        ctx.root_frame(),
        BoundAction::new(
            "server".to_string(),
            action_fn(|_: &String, _| Err(ActionError::msg("tripwire"))),
        ),
    ));
}

#[test]
fn test_tracer_sees_every_dispatch_and_failure() {
    let tracer = Arc::new(Counting::default());

    let mut ctx: ExecutionContext<String> = ExecutionContext::with_config(EngineConfig {
        max_depth: 0,
        ..EngineConfig::default()
    });
    ctx.set_tracer(Some(tracer.clone()));

    seed_ok(&mut ctx);
    seed_ok(&mut ctx);
    seed_failing(&mut ctx);
    // Queues a child that the depth limit will reject.
    ctx.queue_next(QueueEntry::new(
        ctx.root_frame(),
        BoundAction::new(
            "server".to_string(),
            action_fn(|_: &String, ctl| {
                ctl.queue_next(action_fn(|_: &String, _| Ok(())));
                Ok(())
            }),
        ),
    ));

    assert_eq!(ctx.run(64), RunState::Completed);

    // Rejected entries never reach before_execute.
    assert_eq!(tracer.executes.load(Ordering::SeqCst), 4);
    assert_eq!(tracer.errors.load(Ordering::SeqCst), 2);
}

#[test]
fn test_tracer_observes_frame_depths() {
    let tracer = Arc::new(DepthRecorder {
        depths: Mutex::new(Vec::new()),
    });

    let grandchild = action_fn(|_: &String, _| Ok(()));
    let child = action_fn(move |_: &String, ctl| {
        ctl.queue_next(Arc::clone(&grandchild));
        Ok(())
    });
    let root = action_fn(move |_: &String, ctl| {
        ctl.queue_next(Arc::clone(&child));
        Ok(())
    });

    let mut ctx: ExecutionContext<String> = ExecutionContext::new();
    ctx.set_tracer(Some(tracer.clone()));
    ctx.queue_next(QueueEntry::new(
        ctx.root_frame(),
        BoundAction::new("server".to_string(), root),
    ));
    ctx.run(64);

    assert_eq!(*tracer.depths.lock().unwrap(), [0, 1, 2]);
}

#[test]
fn test_mid_drain_swap_splits_the_counts() {
    let first = Arc::new(Counting::default());
    let second = Arc::new(Counting::default());

    let mut ctx: ExecutionContext<String> = ExecutionContext::new();
    ctx.set_tracer(Some(first.clone()));

    seed_ok(&mut ctx);
    seed_ok(&mut ctx);
    let second_in = second.clone();
    ctx.queue_next(QueueEntry::new(
        ctx.root_frame(),
        BoundAction::new(
            "server".to_string(),
            action_fn(move |_: &String, ctl| {
                ctl.set_tracer(Some(second_in.clone()));
                Ok(())
            }),
        ),
    ));
    seed_ok(&mut ctx);
    seed_ok(&mut ctx);

    assert_eq!(ctx.run(64), RunState::Completed);

    // The swapping entry itself still runs under the old tracer.
    assert_eq!(first.executes.load(Ordering::SeqCst), 3);
    assert_eq!(second.executes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_mid_drain_detach_stops_observation() {
    let tracer = Arc::new(Counting::default());

    let mut ctx: ExecutionContext<String> = ExecutionContext::new();
    ctx.set_tracer(Some(tracer.clone()));

    seed_ok(&mut ctx);
    ctx.queue_next(QueueEntry::new(
        ctx.root_frame(),
        BoundAction::new(
            "server".to_string(),
            action_fn(|_: &String, ctl| {
                ctl.set_tracer(None);
                Ok(())
            }),
        ),
    ));
    seed_ok(&mut ctx);
    seed_ok(&mut ctx);

    assert_eq!(ctx.run(64), RunState::Completed);
    assert_eq!(tracer.executes.load(Ordering::SeqCst), 2);
    assert!(ctx.tracer().is_none());
}

#[test]
fn test_panicking_tracer_does_not_stop_the_drain() {
    let ran = Arc::new(AtomicU32::new(0));

    let mut ctx: ExecutionContext<String> = ExecutionContext::new();
    ctx.set_tracer(Some(Arc::new(Panicking)));

    for _ in 0..3 {
        let ran_in = Arc::clone(&ran);
        ctx.queue_next(QueueEntry::new(
            ctx.root_frame(),
            BoundAction::new(
                "server".to_string(),
                action_fn(move |_: &String, _| {
                    ran_in.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            ),
        ));
    }
    seed_failing(&mut ctx);

    assert_eq!(ctx.run(64), RunState::Completed);
    assert_eq!(ran.load(Ordering::SeqCst), 3);
    assert_eq!(ctx.failures().len(), 1);
    // A panicking tracer is logged around, not detached.
    assert!(ctx.tracer().is_some());
}
