/*!
 * Signals Module
 * Blocked-mask ownership and synchronous signal consumption
 */

mod map;
mod waiter;

// Re-export public API
pub use map::SignalMap;
pub use waiter::SignalWaiter;
