//! The channel abstraction the instrument client talks through.

use crate::{cancel::CancelToken, error::Result};

/// A bidirectional, newline framed, connection oriented channel to one instrument.
///
/// Implement this once per physical medium. See [`SerialTransport`](crate::serial::SerialTransport)
/// and [`TcpTransport`](crate::tcp::TcpTransport).
///
/// A transport must release its channel on [`Transport::disconnect`] and again on drop,
/// so the port is freed however the owning scope is left.
pub trait Transport {
    /// Open the channel with the configured parameters.
    ///
    /// Fails with [`Error::AlreadyConnected`](crate::error::Error::AlreadyConnected) if
    /// the channel is already open.
    fn connect(&mut self) -> Result<()>;

    /// Whether the channel is open. Never touches the channel.
    fn is_connected(&self) -> bool;

    /// Send one command line. No reply is awaited.
    ///
    /// Fails with [`Error::NotConnected`](crate::error::Error::NotConnected), without
    /// any I/O, if the channel is closed.
    fn write_line(&mut self, command: &str, cancel: &CancelToken) -> Result<()>;

    /// Send one command line and read exactly one reply line.
    ///
    /// The reply is returned without its terminator or surrounding whitespace. A reply
    /// which does not arrive within the read timeout fails with
    /// [`Error::Timeout`](crate::error::Error::Timeout) and leaves the channel open.
    fn query_line(&mut self, command: &str, cancel: &CancelToken) -> Result<String>;

    /// Release the channel. Safe to call repeatedly; failures while closing are
    /// logged, never returned.
    fn disconnect(&mut self);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn write_line(&mut self, command: &str, cancel: &CancelToken) -> Result<()> {
        (**self).write_line(command, cancel)
    }

    fn query_line(&mut self, command: &str, cancel: &CancelToken) -> Result<String> {
        (**self).query_line(command, cancel)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}
