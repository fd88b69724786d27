//! Unified error type.

use std::fmt;
use std::time::Duration;

/// Boxed error produced by a [`Transport`](crate::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type used inside the dispatch pipeline.
///
/// Dispatch failures never reach caller code as `Error`s: the
/// [`Dispatcher`](crate::Dispatcher) logs them and delivers a
/// [`RestResponse`](crate::RestResponse) without a response handle. The only
/// public API that returns this type directly is
/// [`Config::from_env`](crate::Config::from_env).
#[derive(Debug)]
pub enum Error {
    /// The request context carries no target address.
    AddressMissing,
    /// A header name or value cannot be put on the wire.
    InvalidHeader(String),
    /// Connect, DNS, or protocol failure raised by the transport.
    Transport(BoxError),
    /// No response arrived within the configured request timeout.
    Timeout(Duration),
    /// A configuration value could not be parsed.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressMissing   => f.write_str("request address is missing"),
            Self::InvalidHeader(h) => write!(f, "invalid header: {h}"),
            Self::Transport(e)     => write!(f, "transport: {e}"),
            Self::Timeout(d)       => write!(f, "timed out after {} ms", d.as_millis()),
            Self::Config(msg)      => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<BoxError> for Error {
    fn from(e: BoxError) -> Self {
        Self::Transport(e)
    }
}
