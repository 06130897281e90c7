/*!
 * Shutdown Demo - Main Entry Point
 *
 * Wires both primitives together: a dedicated signal-consumer thread,
 * worker threads parked on a shared exit condition, graceful exit on
 * SIGINT or SIGTERM, SIGUSR1 logged and ignored.
 */

use log::{debug, info};
use sigcond::{Condition, Signal, SignalWaiter};
use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    info!("Shutdown demo starting...");

    let exit = Arc::new(Condition::new(false));

    // Block the signals before any worker spawns so every thread
    // inherits the mask.
    let waiter = Arc::new(SignalWaiter::new(&[
        Signal::SIGINT,
        Signal::SIGTERM,
        Signal::SIGUSR1,
    ])?);

    let consumer = {
        let exit = Arc::clone(&exit);
        waiter.clone().spawn_loop(move |signal| {
            info!("Received signal {}", signal);
            if signal.is_termination() {
                exit.set_notify_all(true);
                return true;
            }
            false
        })
    };

    let worker_count: usize = std::env::var("WORKER_THREADS")
        .ok()
        .and_then(|count| count.parse().ok())
        .unwrap_or(4);

    info!("Spawning {} workers (Ctrl+C to stop)", worker_count);
    let workers: Vec<_> = (0..worker_count)
        .map(|id| {
            let exit = Arc::clone(&exit);
            thread::spawn(move || {
                while !exit.wait_value_for(Duration::from_secs(1), true) {
                    debug!("Worker {} tick", id);
                    /* ... do work ... */
                }
                info!("Worker {} exiting", id);
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let signal = consumer.join().expect("signal consumer panicked")?;
    info!("Exiting (received signal {})", signal);

    Ok(())
}
