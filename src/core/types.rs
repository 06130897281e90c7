/*!
 * Signal Types
 * UNIX signal definitions shared by the wait and sync layers
 */

use crate::core::errors::{SignalError, SignalResult};
use nix::sys::signal::Signal as NixSignal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UNIX signal numbers
///
/// Discriminants match the classic Linux numbering, so `number()` can be
/// handed to anything expecting a raw `c_int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Signal {
    /// Hangup detected on controlling terminal
    SIGHUP = 1,
    /// Interrupt from keyboard (Ctrl+C)
    SIGINT = 2,
    /// Quit from keyboard (Ctrl+\)
    SIGQUIT = 3,
    /// Illegal instruction
    SIGILL = 4,
    /// Trace/breakpoint trap
    SIGTRAP = 5,
    /// Abort signal
    SIGABRT = 6,
    /// Bus error (bad memory access)
    SIGBUS = 7,
    /// Floating-point exception
    SIGFPE = 8,
    /// Kill signal (cannot be caught, blocked or ignored)
    SIGKILL = 9,
    /// User-defined signal 1
    SIGUSR1 = 10,
    /// Invalid memory reference
    SIGSEGV = 11,
    /// User-defined signal 2
    SIGUSR2 = 12,
    /// Broken pipe
    SIGPIPE = 13,
    /// Timer signal
    SIGALRM = 14,
    /// Termination signal
    SIGTERM = 15,
    /// Child process stopped or terminated
    SIGCHLD = 17,
    /// Continue if stopped
    SIGCONT = 18,
    /// Stop process (cannot be caught, blocked or ignored)
    SIGSTOP = 19,
    /// Stop typed at terminal (Ctrl+Z)
    SIGTSTP = 20,
    /// Terminal input for background process
    SIGTTIN = 21,
    /// Terminal output for background process
    SIGTTOU = 22,
    /// Urgent condition on socket
    SIGURG = 23,
    /// CPU time limit exceeded
    SIGXCPU = 24,
    /// File size limit exceeded
    SIGXFSZ = 25,
    /// Virtual alarm clock
    SIGVTALRM = 26,
    /// Profiling timer expired
    SIGPROF = 27,
    /// Window resize signal
    SIGWINCH = 28,
    /// I/O now possible
    SIGIO = 29,
    /// Power failure
    SIGPWR = 30,
    /// Bad system call
    SIGSYS = 31,
}

impl Signal {
    /// Convert from a raw signal number
    pub fn from_number(n: i32) -> SignalResult<Self> {
        match n {
            1 => Ok(Signal::SIGHUP),
            2 => Ok(Signal::SIGINT),
            3 => Ok(Signal::SIGQUIT),
            4 => Ok(Signal::SIGILL),
            5 => Ok(Signal::SIGTRAP),
            6 => Ok(Signal::SIGABRT),
            7 => Ok(Signal::SIGBUS),
            8 => Ok(Signal::SIGFPE),
            9 => Ok(Signal::SIGKILL),
            10 => Ok(Signal::SIGUSR1),
            11 => Ok(Signal::SIGSEGV),
            12 => Ok(Signal::SIGUSR2),
            13 => Ok(Signal::SIGPIPE),
            14 => Ok(Signal::SIGALRM),
            15 => Ok(Signal::SIGTERM),
            17 => Ok(Signal::SIGCHLD),
            18 => Ok(Signal::SIGCONT),
            19 => Ok(Signal::SIGSTOP),
            20 => Ok(Signal::SIGTSTP),
            21 => Ok(Signal::SIGTTIN),
            22 => Ok(Signal::SIGTTOU),
            23 => Ok(Signal::SIGURG),
            24 => Ok(Signal::SIGXCPU),
            25 => Ok(Signal::SIGXFSZ),
            26 => Ok(Signal::SIGVTALRM),
            27 => Ok(Signal::SIGPROF),
            28 => Ok(Signal::SIGWINCH),
            29 => Ok(Signal::SIGIO),
            30 => Ok(Signal::SIGPWR),
            31 => Ok(Signal::SIGSYS),
            _ => Err(SignalError::InvalidSignal(n)),
        }
    }

    /// Get the raw signal number
    pub fn number(self) -> i32 {
        self as i32
    }

    /// Check if the signal can be caught or blocked
    pub fn can_catch(self) -> bool {
        !matches!(self, Signal::SIGKILL | Signal::SIGSTOP)
    }

    /// Check if the signal conventionally requests process termination
    pub fn is_termination(self) -> bool {
        matches!(
            self,
            Signal::SIGHUP | Signal::SIGINT | Signal::SIGQUIT | Signal::SIGTERM
        )
    }

    /// Get a human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Signal::SIGHUP => "Hangup",
            Signal::SIGINT => "Interrupt",
            Signal::SIGQUIT => "Quit",
            Signal::SIGILL => "Illegal instruction",
            Signal::SIGTRAP => "Trace/breakpoint trap",
            Signal::SIGABRT => "Aborted",
            Signal::SIGBUS => "Bus error",
            Signal::SIGFPE => "Floating point exception",
            Signal::SIGKILL => "Killed",
            Signal::SIGUSR1 => "User defined signal 1",
            Signal::SIGSEGV => "Segmentation fault",
            Signal::SIGUSR2 => "User defined signal 2",
            Signal::SIGPIPE => "Broken pipe",
            Signal::SIGALRM => "Alarm clock",
            Signal::SIGTERM => "Terminated",
            Signal::SIGCHLD => "Child status changed",
            Signal::SIGCONT => "Continued",
            Signal::SIGSTOP => "Stopped (signal)",
            Signal::SIGTSTP => "Stopped",
            Signal::SIGTTIN => "Stopped (tty input)",
            Signal::SIGTTOU => "Stopped (tty output)",
            Signal::SIGURG => "Urgent I/O condition",
            Signal::SIGXCPU => "CPU time limit exceeded",
            Signal::SIGXFSZ => "File size limit exceeded",
            Signal::SIGVTALRM => "Virtual timer expired",
            Signal::SIGPROF => "Profiling timer expired",
            Signal::SIGWINCH => "Window size changed",
            Signal::SIGIO => "I/O possible",
            Signal::SIGPWR => "Power failure",
            Signal::SIGSYS => "Bad system call",
        }
    }

    /// Convert to the kernel-facing signal type
    ///
    /// Fails on platforms whose libc does not define this signal.
    pub fn to_nix(self) -> SignalResult<NixSignal> {
        NixSignal::try_from(self.number()).map_err(|_| SignalError::InvalidSignal(self.number()))
    }

    /// Convert from the kernel-facing signal type
    pub fn from_nix(signal: NixSignal) -> SignalResult<Self> {
        Self::from_number(signal as i32)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_number() {
        assert_eq!(Signal::from_number(1).unwrap(), Signal::SIGHUP);
        assert_eq!(Signal::from_number(9).unwrap(), Signal::SIGKILL);
        assert_eq!(Signal::from_number(15).unwrap(), Signal::SIGTERM);
        assert!(Signal::from_number(0).is_err());
        assert!(Signal::from_number(16).is_err());
        assert!(Signal::from_number(99).is_err());
    }

    #[test]
    fn test_signal_properties() {
        // SIGKILL and SIGSTOP cannot be caught
        assert!(!Signal::SIGKILL.can_catch());
        assert!(!Signal::SIGSTOP.can_catch());
        assert!(Signal::SIGTERM.can_catch());
        assert!(Signal::SIGUSR1.can_catch());

        // Termination requests
        assert!(Signal::SIGTERM.is_termination());
        assert!(Signal::SIGINT.is_termination());
        assert!(!Signal::SIGUSR1.is_termination());
        assert!(!Signal::SIGCHLD.is_termination());
    }

    #[test]
    fn test_nix_round_trip() {
        for signal in [
            Signal::SIGINT,
            Signal::SIGTERM,
            Signal::SIGUSR1,
            Signal::SIGUSR2,
        ] {
            let nix = signal.to_nix().unwrap();
            assert_eq!(Signal::from_nix(nix).unwrap(), signal);
            assert_eq!(nix as i32, signal.number());
        }
    }

    #[test]
    fn test_display_includes_number() {
        assert_eq!(Signal::SIGTERM.to_string(), "SIGTERM(15)");
        assert_eq!(Signal::SIGUSR1.to_string(), "SIGUSR1(10)");
        assert_eq!(Signal::SIGTERM.description(), "Terminated");
    }
}
