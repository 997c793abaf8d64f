//! [`Transport`] over a serial port.

use fugit::MillisDurationU32;
use serialport::{DataBits, Parity, SerialPort, StopBits};

use crate::{
    cancel::CancelToken,
    error::{Error, Result},
    io::IoStream,
    line::{LineChannel, poll_interval},
    transport::Transport,
};

/// Most supplies ship configured for 115200 baud.
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Applies to both reads and writes unless configured otherwise.
pub const DEFAULT_TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(5000);

/// Serial port parameters.
///
/// Defaults to 115200 baud, 8 data bits, no parity, 1 stop bit and 5 second timeouts.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialConfig {
    /// E.g. `/dev/ttyUSB0` or `COM3`.
    pub port_name: String,
    pub baud_rate: u32,
    pub parity: Parity,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    /// Maximum time to wait for a complete reply line.
    pub read_timeout: MillisDurationU32,
    /// Maximum time to spend sending a command line.
    pub write_timeout: MillisDurationU32,
}

impl SerialConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            parity: Parity::None,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn read_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn write_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.write_timeout = timeout;
        self
    }
}

type SerialChannel<const L: usize> = LineChannel<IoStream<Box<dyn SerialPort>>, L>;

/// A SCPI channel over a serial port. `L` is the longest reply accepted, in bytes.
///
/// The port is opened by [`Transport::connect`] and closed on
/// [`Transport::disconnect`] or drop.
pub struct SerialTransport<const L: usize = 256> {
    config: SerialConfig,
    channel: Option<SerialChannel<L>>,
}

impl<const L: usize> SerialTransport<L> {
    /// Create a transport. Nothing is opened until [`Transport::connect`].
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            channel: None,
        }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    fn channel(&mut self) -> Result<&mut SerialChannel<L>> {
        self.channel.as_mut().ok_or(Error::NotConnected)
    }
}

impl<const L: usize> Transport for SerialTransport<L> {
    fn connect(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let config = &self.config;
        let port = serialport::new(&config.port_name, config.baud_rate)
            .parity(config.parity)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .timeout(poll_interval(config.read_timeout, config.write_timeout))
            .open()?;

        self.channel = Some(LineChannel::new(
            IoStream(port),
            config.read_timeout,
            config.write_timeout,
        ));
        log::info!(
            "Connected to {} at {} baud",
            config.port_name,
            config.baud_rate
        );
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    fn write_line(&mut self, command: &str, cancel: &CancelToken) -> Result<()> {
        self.channel()?.write_line(command, cancel)
    }

    fn query_line(&mut self, command: &str, cancel: &CancelToken) -> Result<String> {
        self.channel()?.query_line(command, cancel)
    }

    fn disconnect(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.flush() {
                log::warn!("Ignoring flush failure on {}: {e}", self.config.port_name);
            }
            // Dropping the port handle closes it.
            drop(channel);
            log::info!("Disconnected from {}", self.config.port_name);
        }
    }
}

impl<const L: usize> Drop for SerialTransport<L> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
