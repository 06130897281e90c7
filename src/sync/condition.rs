/*!
 * Value-Carrying Condition
 *
 * One mutex/condvar pair guarding a monitored value. Mutation and
 * predicate evaluation happen under the same lock, so a waiter can never
 * miss a wakeup between checking the value and parking.
 */

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Shared state with wait/notify support
///
/// Owns a value of type `T` together with the lock and condition variable
/// used to observe it. Share by reference (`Arc<Condition<T>>`) among all
/// threads that set or wait on the value.
///
/// Waits come in three families: unbounded, duration-bounded (`*_for`),
/// and deadline-bounded (`*_until`), each with a predicate and a
/// value-match form. Bounded waits report expiry as `false`, never as an
/// error or panic.
///
/// # Examples
///
/// ```
/// use sigcond::sync::Condition;
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let exit = Arc::new(Condition::new(false));
/// let worker_exit = exit.clone();
///
/// let worker = thread::spawn(move || {
///     worker_exit.wait_value_for(Duration::from_secs(60), true)
/// });
///
/// exit.set_notify_all(true);
/// assert!(worker.join().unwrap());
/// ```
pub struct Condition<T> {
    value: Mutex<T>,
    condvar: Condvar,
}

impl<T> Condition<T> {
    /// Create a new condition with an initial value
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            condvar: Condvar::new(),
        }
    }

    /// Get the current value
    ///
    /// Takes the lock for the duration of a copy; never parks unless a
    /// writer holds the lock at that instant.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.value.lock()
    }

    /// Store a new value without waking waiters
    ///
    /// A waiter blocked before this call will not observe the new value
    /// until its next wakeup. Pair with [`notify_all`](Self::notify_all)
    /// or use [`set_notify_all`](Self::set_notify_all).
    pub fn set(&self, value: T) {
        *self.value.lock() = value;
    }

    /// Store a new value, then wake one waiter
    pub fn set_notify_one(&self, value: T) {
        {
            let mut guard = self.value.lock();
            *guard = value;
        }
        self.condvar.notify_one();
    }

    /// Store a new value, then wake all waiters
    ///
    /// The store happens under the same lock that waiters hold while
    /// evaluating their predicates: a waiter either observes the new
    /// value directly or is already parked and receives the wakeup.
    pub fn set_notify_all(&self, value: T) {
        {
            let mut guard = self.value.lock();
            *guard = value;
        }
        self.condvar.notify_all();
    }

    /// Wake one waiter without changing the value
    pub fn notify_one(&self) {
        self.condvar.notify_one();
    }

    /// Wake all waiters without changing the value
    pub fn notify_all(&self) {
        self.condvar.notify_all();
    }

    /// Block until notified
    ///
    /// Spurious wakeups are possible; callers that need an actual
    /// condition must use the predicate or value variants.
    pub fn wait(&self) {
        let mut guard = self.value.lock();
        self.condvar.wait(&mut guard);
    }

    /// Block until the predicate holds
    ///
    /// The predicate receives the locked value and is re-checked after
    /// every wakeup.
    pub fn wait_predicate<F>(&self, mut pred: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut guard = self.value.lock();
        while !pred(&guard) {
            self.condvar.wait(&mut guard);
        }
    }

    /// Block until the value equals `target`
    pub fn wait_value(&self, target: T)
    where
        T: PartialEq,
    {
        self.wait_predicate(|value| *value == target);
    }

    /// Block until the predicate holds or `timeout` elapses
    ///
    /// Returns whether the predicate was satisfied.
    pub fn wait_predicate_for<F>(&self, timeout: Duration, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_predicate_until(deadline, pred),
            None => {
                self.wait_predicate(pred);
                true
            }
        }
    }

    /// Block until the value equals `target` or `timeout` elapses
    pub fn wait_value_for(&self, timeout: Duration, target: T) -> bool
    where
        T: PartialEq,
    {
        self.wait_predicate_for(timeout, |value| *value == target)
    }

    /// Block until the predicate holds or `deadline` passes
    ///
    /// A notify and the deadline can race; the predicate is re-checked
    /// once more after expiry so a satisfied condition is never reported
    /// as a timeout.
    pub fn wait_predicate_until<F>(&self, deadline: Instant, mut pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let mut guard = self.value.lock();
        while !pred(&guard) {
            if self.condvar.wait_until(&mut guard, deadline).timed_out() {
                return pred(&guard);
            }
        }
        true
    }

    /// Block until the value equals `target` or `deadline` passes
    pub fn wait_value_until(&self, deadline: Instant, target: T) -> bool
    where
        T: PartialEq,
    {
        self.wait_predicate_until(deadline, |value| *value == target)
    }
}
