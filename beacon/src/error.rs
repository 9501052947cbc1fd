//! Crate error type.
//!
//! Errors fall into three groups:
//!
//! | Group | Variants | Effect |
//! |-------|----------|--------|
//! | Setup | [`Error::NotReady`], [`Error::ConfigRejected`] | audio disabled, lights keep working |
//! | Transient I/O | [`Error::Transmit`], [`Error::NotConfigured`] | logged, no retry |
//! | Pool exhaustion | [`Error::PoolExhausted`] | bounded wait expired, cycle skipped |

use core::fmt;

use crate::config::ConfigError;

/// Peripheral operation that failed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOp {
    /// Submitting a block for transmission.
    Write,
    /// Starting the transmit clock.
    Start,
    /// Stopping the transmit clock.
    Stop,
}

impl fmt::Display for TxOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxOp::Write => "write",
            TxOp::Start => "start",
            TxOp::Stop => "stop",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("audio peripheral not ready")]
    NotReady,

    #[error("audio configuration rejected: {0}")]
    ConfigRejected(ConfigError),

    #[error("audio peripheral {0} failed")]
    Transmit(TxOp),

    #[error("audio peripheral used before configuration")]
    NotConfigured,

    #[error("block pool exhausted")]
    PoolExhausted,
}

impl Error {
    /// Fatal to the audio subsystem only.
    pub fn is_setup_failure(&self) -> bool {
        matches!(self, Error::NotReady | Error::ConfigRejected(_))
    }

    /// Logged and dropped; the caller carries on.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transmit(_) | Error::NotConfigured)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::ConfigRejected(err)
    }
}
