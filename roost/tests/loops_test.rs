// Each loop kind driven on its own against mock collaborators.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use common::{wait_until, MockNode};
use roost::thread::{Monitor, Parked, SocketExit, SocketLoop, TimerLoop, Watchdog, Worker};
use roost_api::{Collaborators, Dispatch, HangDetector, LiveActors};

fn monitor_for(node: &MockNode, workers: usize) -> Arc<Monitor> {
    Arc::new(Monitor::new(workers, node.detectors.as_ref()))
}

#[test]
fn test_socket_loop_ends_on_poller_termination_with_live_actors() {
    let node = MockNode::new(3);
    let monitor = monitor_for(&node, 1);
    node.poller.push_code(0);

    let exit = SocketLoop::new(&monitor, node.collaborators()).run();

    assert_eq!(exit, SocketExit::PollerTerminated);
    assert_eq!(node.actors.remaining(), 3);
}

#[test]
fn test_socket_loop_ends_on_shutdown_while_idle() {
    let node = MockNode::new(0);
    let monitor = monitor_for(&node, 1);

    let exit = SocketLoop::new(&monitor, node.collaborators()).run();

    assert_eq!(exit, SocketExit::Shutdown);
}

#[test]
fn test_socket_event_wakes_parked_worker() {
    let node = MockNode::new(1);
    let monitor = monitor_for(&node, 1);

    let parked = {
        let monitor = Arc::clone(&monitor);
        thread::spawn(move || monitor.park())
    };
    assert!(wait_until(Duration::from_secs(2), || monitor.sleeping() == 1));

    node.poller.push_code(7);
    node.poller.push_code(0);
    let exit = SocketLoop::new(&monitor, node.collaborators()).run();

    assert_eq!(exit, SocketExit::PollerTerminated);
    assert_eq!(parked.join().unwrap(), Parked::Woken);
}

#[test]
fn test_timer_releases_poller_and_workers_on_shutdown() {
    let node = MockNode::new(1);
    let monitor = monitor_for(&node, 3);

    let parked: Vec<_> = (0..3)
        .map(|_| {
            let monitor = Arc::clone(&monitor);
            thread::spawn(move || while monitor.park() == Parked::Woken {})
        })
        .collect();
    assert!(wait_until(Duration::from_secs(2), || monitor.sleeping() == 3));

    let timer = {
        let monitor = Arc::clone(&monitor);
        let collaborators = node.collaborators();
        thread::spawn(move || {
            TimerLoop::new(&monitor, collaborators, Duration::from_micros(2500), 2).run()
        })
    };
    thread::sleep(Duration::from_millis(30));
    node.actors.set(0);

    let ticks = timer.join().unwrap();
    assert!(ticks > 0);
    assert!(node.clock.advances.load(Ordering::SeqCst) as u64 > ticks);
    assert!(node.poller.exit_signalled.load(Ordering::SeqCst));
    assert!(monitor.is_closed());
    for handle in parked {
        handle.join().unwrap();
    }
    assert_eq!(monitor.sleeping(), 0);
}

#[test]
fn test_watchdog_checks_every_detector_each_sweep() {
    let node = MockNode::new(1);
    let monitor = monitor_for(&node, 4);
    let actors = node.actors.clone();

    let watchdog = {
        let monitor = Arc::clone(&monitor);
        let actors = actors.clone();
        thread::spawn(move || Watchdog::new(&monitor, actors.as_ref(), Duration::from_millis(5), 2).run())
    };
    assert!(wait_until(Duration::from_secs(2), || {
        node.detectors.checks.load(Ordering::SeqCst) >= 8
    }));
    actors.set(0);

    let sweeps = watchdog.join().unwrap();
    assert!(sweeps >= 2);
    assert_eq!(node.detectors.checks.load(Ordering::SeqCst) as u64, sweeps * 4);
}

#[test]
fn test_watchdog_exits_within_one_step_of_shutdown() {
    let node = MockNode::new(1);
    let monitor = monitor_for(&node, 1);
    let actors = node.actors.clone();

    let watchdog = {
        let monitor = Arc::clone(&monitor);
        let actors = actors.clone();
        thread::spawn(move || Watchdog::new(&monitor, actors.as_ref(), Duration::from_secs(1), 5).run())
    };
    // Land in the middle of the five-second sleep.
    thread::sleep(Duration::from_millis(1500));
    let triggered = Instant::now();
    actors.set(0);

    assert!(wait_until(Duration::from_millis(1500), || watchdog.is_finished()));
    assert!(triggered.elapsed() <= Duration::from_millis(1200));
    assert_eq!(watchdog.join().unwrap(), 1);
}

#[test]
fn test_busy_worker_never_parks() {
    let node = MockNode::new(1);
    let monitor = monitor_for(&node, 2);
    node.dispatcher.inject(200_000);

    let workers: Vec<_> = (0..2)
        .map(|id| {
            let monitor = Arc::clone(&monitor);
            let collaborators = node.collaborators();
            thread::spawn(move || Worker::new(id, &monitor, collaborators).run())
        })
        .collect();

    while node.dispatcher.did_work.load(Ordering::SeqCst) < 100_000 {
        assert_eq!(monitor.sleeping(), 0);
    }
    node.actors.set(0);

    let mut dispatched = 0;
    for handle in workers {
        let stats = handle.join().unwrap();
        assert_eq!(stats.parks, 0);
        dispatched += stats.dispatched;
    }
    assert_eq!(dispatched, 200_000);
}

#[test]
fn test_worker_exits_when_dispatcher_always_panics_without_actors() {
    let node = MockNode::new(0);
    let monitor = Monitor::new(1, node.detectors.as_ref());
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = {
        let calls = Arc::clone(&calls);
        move |_detector: &dyn HangDetector| -> Dispatch {
            calls.fetch_add(1, Ordering::SeqCst);
            panic!("actor blew up")
        }
    };
    let collaborators = Collaborators {
        dispatcher: Arc::new(dispatcher),
        ..node.collaborators()
    };

    let stats = Worker::new(0, &monitor, collaborators).run();

    assert_eq!(stats.panics, 1);
    assert_eq!(stats.parks, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_worker_parks_after_dispatch_panic_and_resumes_on_wakeup() {
    let node = MockNode::new(1);
    let monitor = Arc::new(Monitor::new(1, node.detectors.as_ref()));
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = {
        let calls = Arc::clone(&calls);
        let actors = node.actors.clone();
        move |_detector: &dyn HangDetector| match calls.fetch_add(1, Ordering::SeqCst) {
            0 => panic!("actor blew up"),
            1 => Dispatch::DidWork,
            _ => {
                actors.set(0);
                Dispatch::NoWork
            }
        }
    };
    let collaborators = Collaborators {
        dispatcher: Arc::new(dispatcher),
        ..node.collaborators()
    };

    let worker = {
        let monitor = Arc::clone(&monitor);
        thread::spawn(move || Worker::new(0, &monitor, collaborators).run())
    };
    assert!(wait_until(Duration::from_secs(2), || monitor.sleeping() == 1));
    monitor.wake_if_needed(0);

    let stats = worker.join().unwrap();
    assert_eq!(stats.panics, 1);
    assert_eq!(stats.dispatched, 1);
    assert!(stats.parks >= 1);
}

#[test]
fn test_timer_panic_still_releases_poller_and_workers() {
    let node = MockNode::new(1);
    node.clock.panic_on_advance.store(true, Ordering::SeqCst);
    let monitor = monitor_for(&node, 2);

    let parked: Vec<_> = (0..2)
        .map(|_| {
            let monitor = Arc::clone(&monitor);
            thread::spawn(move || while monitor.park() == Parked::Woken {})
        })
        .collect();
    assert!(wait_until(Duration::from_secs(2), || monitor.sleeping() == 2));

    let timer = {
        let monitor = Arc::clone(&monitor);
        let collaborators = node.collaborators();
        thread::spawn(move || {
            TimerLoop::new(&monitor, collaborators, Duration::from_micros(2500), 1).run()
        })
    };

    assert!(timer.join().is_err());
    assert!(node.poller.exit_signalled.load(Ordering::SeqCst));
    assert!(monitor.is_closed());
    for handle in parked {
        handle.join().unwrap();
    }
    assert_eq!(node.actors.remaining(), 1);
}

#[test]
fn test_socket_event_wakes_exactly_one_of_four_parked_workers() {
    let node = MockNode::new(5);
    let monitor = Monitor::new(4, node.detectors.as_ref());

    thread::scope(|scope| {
        let monitor = &monitor;
        for id in 0..4 {
            let collaborators = node.collaborators();
            thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn_scoped(scope, move || Worker::new(id, monitor, collaborators).run())
                .unwrap();
        }
        let socket_collaborators = node.collaborators();
        scope.spawn(move || SocketLoop::new(monitor, socket_collaborators).run());
        let actors = node.actors.clone();
        scope.spawn(move || Watchdog::new(monitor, actors.as_ref(), Duration::from_millis(5), 2).run());

        // No timer yet: the socket event is the only source of wakeups.
        assert!(wait_until(Duration::from_secs(2), || monitor.sleeping() == 4));
        let before = node.dispatcher.calls_snapshot();
        assert_eq!(before.len(), 4);

        node.dispatcher.inject(1);
        node.poller.push_code(1);
        assert!(wait_until(Duration::from_secs(2), || {
            node.dispatcher.did_work.load(Ordering::SeqCst) == 1
        }));
        assert!(wait_until(Duration::from_secs(2), || monitor.sleeping() == 4));

        let after = node.dispatcher.calls_snapshot();
        let woken: Vec<_> = after
            .iter()
            .filter(|(name, calls)| before.get(*name) != Some(*calls))
            .map(|(name, _)| name.clone())
            .collect();
        assert_eq!(woken.len(), 1, "woken workers: {:?}", woken);
        // The event itself, then the empty check before parking again.
        assert_eq!(after[&woken[0]], before[&woken[0]] + 2);
        assert_eq!(*node.dispatcher.workers_that_worked.lock().unwrap(), woken);

        // Shutdown goes through the timer's final release.
        node.actors.set(0);
        let shutdown_started = Instant::now();
        let timer_collaborators = node.collaborators();
        scope.spawn(move || {
            TimerLoop::new(monitor, timer_collaborators, Duration::from_micros(2500), 3).run()
        });
        assert!(wait_until(Duration::from_secs(2), || {
            node.poller.exit_signalled.load(Ordering::SeqCst) && monitor.sleeping() == 0
        }));
        assert!(shutdown_started.elapsed() < Duration::from_secs(2));
    });

    assert_eq!(node.dispatcher.did_work.load(Ordering::SeqCst), 1);
}
