//! Error type for the few operations that can fail at runtime.
//!
//! Timing operations never fail. Misconfiguration is caught at compile time
//! in [`crate::config`], and overload is an accepted consequence of the
//! cooperative model, not a reported fault.

use core::fmt;

/// Result type used throughout tickloop.
pub type Result<T> = core::result::Result<T, Error>;

/// Runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The task table has no free slot left.
    TableFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TableFull => write!(f, "Task table is full"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::TableFull => defmt::write!(fmt, "TableFull"),
        }
    }
}
