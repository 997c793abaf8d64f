//! Adapts `std::io` streams (serial ports, sockets) to [embedded_io].

/// Wraps any [std::io::Read] + [std::io::Write] so it can back a
/// [`LineChannel`](crate::line::LineChannel).
pub struct IoStream<T>(pub T);

/// A [std::io::Error] carrying an [embedded_io::ErrorKind].
#[derive(Debug)]
pub struct IoError(pub std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    /// Only the kinds a [`LineChannel`](crate::line::LineChannel) treats as idle are
    /// distinguished. Everything else is a fault, described by the wrapped error.
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            // Port and socket read timeouts surface as WouldBlock on unix.
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                embedded_io::ErrorKind::TimedOut
            }
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl<T> embedded_io::ErrorType for IoStream<T> {
    type Error = IoError;
}

impl<T: std::io::Read> embedded_io::Read for IoStream<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl<T: std::io::Write> embedded_io::Write for IoStream<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}
