/*!
 * Error Types
 * Failure taxonomy for signal-set setup and synchronous consumption
 */

use nix::errno::Errno;
use thiserror::Error;

/// Signal operation result
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Unknown or out-of-range signal number
    #[error("Invalid signal: {0}")]
    InvalidSignal(i32),

    /// Building or blocking the signal set failed; fatal to construction
    #[error("Failed to block signal set: {0}")]
    Setup(Errno),

    /// The synchronous wait primitive failed
    #[error("Failed to wait for signal: {0}")]
    Wait(Errno),
}

impl SignalError {
    /// Check if the failed call may be retried on the same waiter
    ///
    /// Setup failures leave no usable waiter behind; wait failures do not
    /// corrupt the blocked set and the caller may simply wait again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SignalError::Wait(_))
    }
}
