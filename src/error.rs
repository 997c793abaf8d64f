//! Our error types for SCPI power supply communications.

use fugit::MillisDurationU32;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Error type shared by the transports and the instrument client.
#[derive(Error, Debug)]
pub enum Error {
    /// A write or query was attempted while the connection handle is closed.
    #[error("Not connected")]
    NotConnected,
    /// `connect` was called on a handle which is already open.
    #[error("Already connected")]
    AlreadyConnected,
    /// A read or write did not complete within the configured duration.
    ///
    /// The connection stays open.
    #[error("Communication timeout after {} ms", .0.to_millis())]
    Timeout(MillisDurationU32),
    /// The reply could not be parsed. Holds the reply as received.
    #[error("Unexpected response: {0:?}")]
    MalformedResponse(String),
    /// The caller cancelled the operation.
    #[error("Operation canceled")]
    Canceled,
    /// A numeric argument which cannot be sent to the instrument (NaN or infinite).
    #[error("Invalid numeric value: {0}")]
    InvalidValue(f64),
    /// The reply did not fit in the line buffer.
    #[error("Line buffer overflow")]
    BufferOverflow,
    /// The channel reported a fault while reading or writing.
    ///
    /// `source` is the error raised by the underlying stream, unmodified.
    #[error("Channel error ({kind:?}): {source}")]
    Io {
        kind: embedded_io::ErrorKind,
        #[source]
        source: Box<dyn core::error::Error + Send + Sync>,
    },
    /// The serial port could not be opened.
    #[error("Failed to open serial port: {0}")]
    Open(#[from] serialport::Error),
    /// The network connection could not be established.
    #[error("Failed to connect: {0}")]
    Connect(#[source] std::io::Error),
}

impl Error {
    /// Build a [`Error::MalformedResponse`] from the offending reply text.
    pub(crate) fn malformed(reply: &str) -> Self {
        Error::MalformedResponse(reply.to_owned())
    }

    /// Wrap a fault raised by the stream under a channel.
    pub(crate) fn io<E>(err: E) -> Self
    where
        E: embedded_io::Error + Send + Sync + 'static,
    {
        Error::Io {
            kind: embedded_io::Error::kind(&err),
            source: Box::new(err),
        }
    }
}
