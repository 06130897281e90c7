/*!
 * Signal Map
 * Fixed signal-to-value mapping for the signal-to-state bridge
 */

use crate::core::types::Signal;
use ahash::RandomState;
use std::collections::HashMap;

/// Mapping from a delivered signal to the value it publishes
///
/// Consulted by [`SignalWaiter::wait_and_map`](crate::signals::SignalWaiter::wait_and_map);
/// signals without an entry are ignored and waiting continues. Intended to
/// be built once, before the consuming thread starts.
#[derive(Debug, Clone)]
pub struct SignalMap<T> {
    entries: HashMap<Signal, T, RandomState>,
}

impl<T> SignalMap<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Map `signal` to `value`, returning any previous mapping
    pub fn insert(&mut self, signal: Signal, value: T) -> Option<T> {
        self.entries.insert(signal, value)
    }

    /// Look up the value mapped to `signal`
    pub fn get(&self, signal: Signal) -> Option<T>
    where
        T: Copy,
    {
        self.entries.get(&signal).copied()
    }

    /// Check if a mapping exists for `signal`
    pub fn contains(&self, signal: Signal) -> bool {
        self.entries.contains_key(&signal)
    }

    /// Get the number of mapped signals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SignalMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(Signal, T)> for SignalMap<T> {
    fn from_iter<I: IntoIterator<Item = (Signal, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
