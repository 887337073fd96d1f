//! Driver error type

use core::fmt;

use bgt24_protocol::FrameError;

/// Errors returned by [`Bgt24ltr11`](crate::Bgt24ltr11) operations
///
/// Every failure is reported to the caller of the operation that hit it;
/// the driver keeps no state between calls and is ready for the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The serial port reported an error
    Transport(E),
    /// No reply started within the response timeout, or a reply stalled
    /// for longer than the inter-byte timeout
    Timeout,
    /// The input went quiet (or the scan limit was hit) without a matching frame
    NoFrame,
    /// A matching frame was malformed, failed its checksum, or carried an
    /// undocumented code
    Frame(FrameError),
    /// Request parameters rejected before anything was sent
    InvalidArgument,
    /// The module answered a set command with a different value
    EchoMismatch,
}

impl<E> From<FrameError> for Error<E> {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::InvalidArgument => Error::InvalidArgument,
            other => Error::Frame(other),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "serial transport error: {:?}", e),
            Error::Timeout => f.write_str("timed out waiting for the radar"),
            Error::NoFrame => f.write_str("no matching frame in the input"),
            Error::Frame(FrameError::InvalidChecksum { expected, received }) => write!(
                f,
                "checksum mismatch: computed {:#06x}, received {:#06x}",
                expected, received
            ),
            Error::Frame(e) => write!(f, "malformed frame: {:?}", e),
            Error::InvalidArgument => f.write_str("invalid request parameters"),
            Error::EchoMismatch => f.write_str("radar did not apply the requested value"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
