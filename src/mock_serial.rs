//! We use this mocking module in unit tests to emulate a serial-attached supply.

use fugit::MillisDurationU32;

use crate::{
    cancel::CancelToken,
    error::{Error, Result},
    line::LineChannel,
    transport::Transport,
};

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Everything written to the port.
    write_buffer: heapless::Vec<u8, 256>,
    /// Pre-loaded reply bytes handed out by `read()`.
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Debug)]
pub enum MockSerialError {
    /// Simulated buffer overflow
    BufferOverflow,
    /// Generic simulated error for testing
    SimulatedError,
    /// No data available, as a real port reports when its read timeout expires.
    WouldBlock,
}

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MockSerialError::BufferOverflow => write!(f, "Mock buffer overflow"),
            MockSerialError::SimulatedError => write!(f, "Simulated error"),
            MockSerialError::WouldBlock => write!(f, "No data available"),
        }
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::TimedOut,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        let pending = &self.read_buffer[self.read_position..];
        if pending.is_empty() {
            return Err(MockSerialError::WouldBlock);
        }

        let count = core::cmp::min(buf.len(), pending.len());
        buf[..count].copy_from_slice(&pending[..count]);
        self.read_position += count;
        Ok(count)
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Set the data that will be returned when read() is called
    pub fn set_read_data(&mut self, data: &[u8]) -> core::result::Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Queue one reply line, terminator included, after any data already loaded.
    pub fn push_reply(&mut self, reply: &str) {
        for &byte in reply.as_bytes().iter().chain(b"\n") {
            self.read_buffer.push(byte).expect("mock read buffer full");
        }
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// The written data split into command lines.
    pub fn written_lines(&self) -> Vec<&str> {
        core::str::from_utf8(&self.write_buffer)
            .expect("commands are ASCII")
            .lines()
            .collect()
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

/// A [`Transport`] backed by [`MockSerial`], with short timeouts.
pub struct MockTransport {
    channel: LineChannel<MockSerial, 256>,
    connected: bool,
}

impl MockTransport {
    pub const TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(20);

    /// A transport which has not been connected yet.
    pub fn new() -> Self {
        Self {
            channel: LineChannel::new(MockSerial::new(), Self::TIMEOUT, Self::TIMEOUT),
            connected: false,
        }
    }

    /// A transport which is already connected.
    pub fn connected() -> Self {
        let mut transport = Self::new();
        transport.connected = true;
        transport
    }

    pub fn serial(&self) -> &MockSerial {
        self.channel.get_ref()
    }

    pub fn serial_mut(&mut self) -> &mut MockSerial {
        self.channel.get_mut()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn write_line(&mut self, command: &str, cancel: &CancelToken) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.channel.write_line(command, cancel)
    }

    fn query_line(&mut self, command: &str, cancel: &CancelToken) -> Result<String> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.channel.query_line(command, cancel)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, Read, Write};

    #[test]
    fn test_write_data() {
        let mut mock = MockSerial::new();
        mock.write(b"VOLT ").unwrap();
        mock.write(b"7\n").unwrap();
        assert_eq!(mock.written_data(), b"VOLT 7\n");
        assert_eq!(mock.written_lines(), ["VOLT 7"]);
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let result = mock.write(&[0u8; 300]);
        assert!(matches!(result, Err(MockSerialError::BufferOverflow)));
    }

    #[test]
    fn test_push_reply_appends_lines() {
        let mut mock = MockSerial::new();
        mock.push_reply("1");
        mock.push_reply("12.5");

        let mut buffer = [0u8; 16];
        let count = mock.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..count], b"1\n12.5\n");
    }

    #[test]
    fn test_read_would_block_when_exhausted() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Hi").unwrap();

        let mut buffer = [0u8; 10];
        assert_eq!(mock.read(&mut buffer).unwrap(), 2);
        let err = mock.read(&mut buffer).unwrap_err();
        assert!(matches!(err, MockSerialError::WouldBlock));
        assert_eq!(err.kind(), embedded_io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_errors_describe_themselves() {
        let err: Box<dyn core::error::Error + Send + Sync> =
            Box::new(MockSerialError::SimulatedError);
        assert_eq!(err.to_string(), "Simulated error");
        assert_eq!(MockSerialError::WouldBlock.kind(), embedded_io::ErrorKind::TimedOut);
        assert_eq!(
            MockSerialError::BufferOverflow.to_string(),
            "Mock buffer overflow"
        );
    }

    #[test]
    fn test_error_flags_toggle() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);
        assert!(mock.write(b"test").is_err());
        assert!(mock.flush().is_err());
        mock.set_write_error(false);
        assert!(mock.write(b"test").is_ok());

        mock.set_read_data(b"data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 10];
        assert!(mock.read(&mut buffer).is_err());
        mock.set_read_error(false);
        assert!(mock.read(&mut buffer).is_ok());
    }

    #[test]
    fn test_mock_transport_requires_connection() {
        let mut transport = MockTransport::new();
        let cancel = CancelToken::new();
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.write_line("*RST", &cancel),
            Err(crate::error::Error::NotConnected)
        ));

        transport.connect().unwrap();
        assert!(matches!(
            transport.connect(),
            Err(crate::error::Error::AlreadyConnected)
        ));
        transport.write_line("*RST", &cancel).unwrap();
        assert_eq!(transport.serial().written_lines(), ["*RST"]);
    }
}
