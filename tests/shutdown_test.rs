/*!
 * Graceful Shutdown Integration Tests
 *
 * End-to-end delivery scenarios: real signals sent with pthread_kill at
 * a dedicated consumer thread, worker threads parked on the shared
 * condition. Serialized because signal masks and pending sets are
 * process-wide state.
 */

use nix::sys::pthread::{pthread_kill, Pthread};
use parking_lot::Mutex;
use serial_test::serial;
use sigcond::{Condition, Signal, SignalMap, SignalWaiter};
use std::os::unix::thread::JoinHandleExt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Spawn a consumer thread and return its pthread id for targeted kills
///
/// Signals are aimed at this specific thread rather than the process:
/// the harness threads do not block them, and a process-directed
/// termination signal landing there would take the whole binary down.
fn spawn_consumer<F, R>(body: F) -> (Pthread, thread::JoinHandle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let handle = thread::spawn(body);
    let tid = handle.as_pthread_t();
    // Let the consumer reach its blocking wait before anyone signals it
    thread::sleep(Duration::from_millis(100));
    (tid, handle)
}

#[test]
#[serial]
fn test_round_trip_per_signal() {
    for test_signal in [
        Signal::SIGINT,
        Signal::SIGTERM,
        Signal::SIGUSR1,
        Signal::SIGUSR2,
    ] {
        let exit = Arc::new(Condition::new(false));
        let waiter = Arc::new(SignalWaiter::new(&[test_signal]).unwrap());

        let (consumer_tid, consumer) = {
            let waiter = waiter.clone();
            let exit = exit.clone();
            spawn_consumer(move || {
                let map: SignalMap<bool> = [(test_signal, true)].into_iter().collect();
                waiter.wait_and_map(&map, &exit)
            })
        };

        let workers: Vec<_> = (0..10)
            .map(|_| {
                let exit = exit.clone();
                thread::spawn(move || {
                    exit.wait_value_for(Duration::from_secs(10), true);
                    exit.get()
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(100));
        pthread_kill(consumer_tid, test_signal.to_nix().unwrap()).unwrap();

        for worker in workers {
            assert!(worker.join().unwrap());
        }

        assert_eq!(consumer.join().unwrap().unwrap(), test_signal);
    }
}

#[test]
#[serial]
fn test_ten_workers_released_within_bound() {
    let exit = Arc::new(Condition::new(false));
    let waiter = Arc::new(SignalWaiter::new(&[Signal::SIGUSR1]).unwrap());

    let (consumer_tid, consumer) = {
        let waiter = waiter.clone();
        let exit = exit.clone();
        spawn_consumer(move || {
            let map: SignalMap<bool> = [(Signal::SIGUSR1, true)].into_iter().collect();
            waiter.wait_and_map(&map, &exit)
        })
    };

    let workers: Vec<_> = (0..10)
        .map(|_| {
            let exit = exit.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let satisfied = exit.wait_value_for(Duration::from_secs(60), true);
                (satisfied, start.elapsed())
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    pthread_kill(consumer_tid, Signal::SIGUSR1.to_nix().unwrap()).unwrap();

    assert_eq!(consumer.join().unwrap().unwrap(), Signal::SIGUSR1);

    // All workers wake on the notify, nowhere near the one-minute bound
    for worker in workers {
        let (satisfied, elapsed) = worker.join().unwrap();
        assert!(satisfied);
        assert!(elapsed < Duration::from_secs(5));
    }
}

#[test]
#[serial]
fn test_wait_loop_continue_then_stop_in_delivery_order() {
    let waiter = Arc::new(SignalWaiter::new(&[Signal::SIGINT, Signal::SIGTERM]).unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let (consumer_tid, consumer) = {
        let waiter = waiter.clone();
        let seen = seen.clone();
        spawn_consumer(move || {
            waiter.wait_loop(move |signal| {
                seen.lock().push(signal);
                signal == Signal::SIGINT
            })
        })
    };

    pthread_kill(consumer_tid, Signal::SIGTERM.to_nix().unwrap()).unwrap();
    // Keep the deliveries ordered; two signals pending at once are
    // reaped lowest-number-first, which would invert them
    thread::sleep(Duration::from_millis(100));
    pthread_kill(consumer_tid, Signal::SIGINT.to_nix().unwrap()).unwrap();

    assert_eq!(consumer.join().unwrap().unwrap(), Signal::SIGINT);
    assert_eq!(*seen.lock(), vec![Signal::SIGTERM, Signal::SIGINT]);
}

#[test]
#[serial]
fn test_wait_and_map_publishes_mapped_value() {
    let state = Arc::new(Condition::new(0i32));
    let waiter = Arc::new(SignalWaiter::new(&[Signal::SIGUSR1]).unwrap());

    let (consumer_tid, consumer) = {
        let waiter = waiter.clone();
        let state = state.clone();
        spawn_consumer(move || {
            let map: SignalMap<i32> = [(Signal::SIGUSR1, 7)].into_iter().collect();
            waiter.wait_and_map(&map, &state)
        })
    };

    pthread_kill(consumer_tid, Signal::SIGUSR1.to_nix().unwrap()).unwrap();

    assert_eq!(consumer.join().unwrap().unwrap(), Signal::SIGUSR1);
    assert_eq!(state.get(), 7);
}

#[test]
#[serial]
fn test_spawn_loop_yields_terminating_signal() {
    let exit = Arc::new(Condition::new(false));
    let waiter = Arc::new(SignalWaiter::new(&[Signal::SIGUSR1, Signal::SIGTERM]).unwrap());

    let consumer = {
        let exit = Arc::clone(&exit);
        waiter.clone().spawn_loop(move |signal| {
            if signal.is_termination() {
                exit.set_notify_all(true);
                return true;
            }
            false
        })
    };
    let consumer_tid = consumer.as_pthread_t();

    let worker = {
        let exit = exit.clone();
        thread::spawn(move || exit.wait_value_for(Duration::from_secs(10), true))
    };

    thread::sleep(Duration::from_millis(100));
    pthread_kill(consumer_tid, Signal::SIGUSR1.to_nix().unwrap()).unwrap();
    thread::sleep(Duration::from_millis(100));
    pthread_kill(consumer_tid, Signal::SIGTERM.to_nix().unwrap()).unwrap();

    assert_eq!(consumer.join().unwrap().unwrap(), Signal::SIGTERM);
    assert!(worker.join().unwrap());
}
