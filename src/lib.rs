/*!
 * sigcond Library
 * Graceful-shutdown primitives: a value-carrying condition and a
 * synchronous signal waiter
 */

pub mod core;
pub mod signals;
pub mod sync;

// Re-exports
pub use crate::core::errors::{SignalError, SignalResult};
pub use crate::core::types::Signal;
pub use crate::signals::{SignalMap, SignalWaiter};
pub use crate::sync::Condition;
