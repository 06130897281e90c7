/*!
 * Signal Waiter
 * Blocks a fixed signal set and consumes delivered signals synchronously
 */

use crate::core::errors::{SignalError, SignalResult};
use crate::core::types::Signal;
use crate::signals::map::SignalMap;
use crate::sync::Condition;
use log::{debug, warn};
use nix::sys::signal::{pthread_sigmask, SigSet, SigmaskHow};
use std::fmt;
use std::sync::Arc;
use std::thread;

/// Owner of a blocked signal set with synchronous consumption
///
/// Construction blocks the given signals in the *calling* thread's mask.
/// Thread masks are inherited at spawn time only, so the waiter must be
/// built before any worker thread starts; threads spawned earlier keep
/// their old mask and may still receive the signals asynchronously.
///
/// Exactly one thread at a time should consume signals from a given
/// waiter. Any blocked thread may reap a pending process-directed signal,
/// so deterministic handling requires a single dedicated consumer running
/// [`wait_one`](Self::wait_one) or [`wait_loop`](Self::wait_loop),
/// typically via [`spawn_loop`](Self::spawn_loop).
///
/// Dropping the waiter unblocks the set in the mask of the thread that
/// runs the drop, not necessarily the thread that constructed it. Drop on
/// the constructing thread; a cross-thread drop leaves the constructing
/// thread's mask in place and clears bits in the dropping thread's mask
/// instead. Threads that inherited the mask are unaffected either way.
pub struct SignalWaiter {
    set: SigSet,
    signals: Vec<Signal>,
}

impl SignalWaiter {
    /// Block `signals` in the calling thread's mask and take ownership of
    /// the set
    ///
    /// Fails with [`SignalError::Setup`] if the mask operation is
    /// rejected; no partially-blocked waiter is ever returned.
    pub fn new(signals: &[Signal]) -> SignalResult<Self> {
        let mut set = SigSet::empty();
        for &signal in signals {
            if !signal.can_catch() {
                warn!("Blocking {} has no effect; the kernel ignores it", signal);
            }
            set.add(signal.to_nix()?);
        }

        pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&set), None).map_err(SignalError::Setup)?;
        debug!("Blocked signal set: {:?}", signals);

        Ok(Self {
            set,
            signals: signals.to_vec(),
        })
    }

    /// Get the managed signal set, fixed at construction
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Block until one of the managed signals is pending, consume it, and
    /// return it
    ///
    /// Fails with [`SignalError::Wait`] if the underlying wait primitive
    /// errors; the blocked set is untouched and the call may be retried.
    pub fn wait_one(&self) -> SignalResult<Signal> {
        let raw = self.set.wait().map_err(SignalError::Wait)?;
        let signal = Signal::from_nix(raw)?;
        debug!("Consumed signal {}", signal);
        Ok(signal)
    }

    /// Consume signals until the handler asks to stop
    ///
    /// Each consumed signal is passed to `handler`; returning `true`
    /// stops the loop and yields that signal, `false` continues waiting.
    /// Occupies the calling thread until a terminating signal arrives.
    pub fn wait_loop<F>(&self, mut handler: F) -> SignalResult<Signal>
    where
        F: FnMut(Signal) -> bool,
    {
        loop {
            let signal = self.wait_one()?;
            if handler(signal) {
                debug!("Handler stopped signal loop on {}", signal);
                return Ok(signal);
            }
        }
    }

    /// Run [`wait_loop`](Self::wait_loop) on a dedicated thread
    ///
    /// The returned handle yields the terminating signal. The spawned
    /// thread inherits the blocked mask, so it is a valid consumer. Keep
    /// a clone of the `Arc` to control which thread runs the final drop.
    pub fn spawn_loop<F>(self: Arc<Self>, handler: F) -> thread::JoinHandle<SignalResult<Signal>>
    where
        F: FnMut(Signal) -> bool + Send + 'static,
    {
        thread::spawn(move || self.wait_loop(handler))
    }

    /// Consume signals until one with a mapping arrives, publish its
    /// value, and return it
    ///
    /// A mapped signal stores its value into `condition` and wakes all
    /// waiters in one step; unmapped signals are ignored and waiting
    /// continues.
    pub fn wait_and_map<T>(
        &self,
        map: &SignalMap<T>,
        condition: &Condition<T>,
    ) -> SignalResult<Signal>
    where
        T: Copy,
    {
        loop {
            let signal = self.wait_one()?;
            match map.get(signal) {
                Some(value) => {
                    condition.set_notify_all(value);
                    debug!("Published mapped value for signal {}", signal);
                    return Ok(signal);
                }
                None => debug!("Ignoring unmapped signal {}", signal),
            }
        }
    }
}

impl Drop for SignalWaiter {
    fn drop(&mut self) {
        // Affects the dropping thread's own mask; see the type docs.
        if let Err(err) = pthread_sigmask(SigmaskHow::SIG_UNBLOCK, Some(&self.set), None) {
            warn!("Failed to unblock signal set: {}", err);
        }
    }
}

impl fmt::Debug for SignalWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalWaiter")
            .field("signals", &self.signals)
            .finish()
    }
}
