//! This crate provides an interface for controlling bench DC power supplies which speak
//! SCPI over a serial line.
//!
//! Commands and replies are newline terminated ASCII lines. [`psu::ScpiPsu`] turns typed
//! calls (set voltage, enable output, measure power...) into command lines and parses
//! the replies. It talks through any [`transport::Transport`]; [`serial::SerialTransport`]
//! drives a serial port and [`tcp::TcpTransport`] a raw SCPI socket.
//!
//! The serial port used for PSU comms is configured like so by default:
//! * Baud rate: 115200
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//! * Read and write timeouts: 5 seconds
//!
//! ```no_run
//! use scpi_psu::{psu::ScpiPsu, serial::{SerialConfig, SerialTransport}};
//!
//! # fn main() -> scpi_psu::error::Result<()> {
//! let transport: SerialTransport = SerialTransport::new(SerialConfig::new("/dev/ttyUSB0"));
//! let mut psu = ScpiPsu::new(transport);
//! psu.connect()?;
//! psu.set_voltage(5.0)?;
//! psu.set_output(true)?;
//! let reading = psu.measure_all()?;
//! println!("{} V, {} A, {} W", reading.voltage, reading.current, reading.power);
//! # Ok(())
//! # }
//! ```
//!
//! Logging goes through the [`log`] facade; install any logger to see the command
//! traffic at `debug` level.

pub mod cancel;
pub mod command;
pub mod error;
pub mod format;
pub mod io;
pub mod line;
pub mod psu;
pub mod serial;
pub mod tcp;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock_serial;
