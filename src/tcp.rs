//! [`Transport`] over a raw SCPI socket, for supplies with a LAN port or behind a
//! serial-to-ethernet bridge.

use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use fugit::MillisDurationU32;

use crate::{
    cancel::CancelToken,
    error::{Error, Result},
    io::IoStream,
    line::{LineChannel, poll_interval},
    serial::DEFAULT_TIMEOUT,
    transport::Transport,
};

/// Conventional port for SCPI raw socket connections.
pub const DEFAULT_PORT: u16 = 5025;

#[derive(Debug, Clone, PartialEq)]
pub struct TcpConfig {
    /// Host name or IP address.
    pub host: String,
    pub port: u16,
    pub connect_timeout: MillisDurationU32,
    pub read_timeout: MillisDurationU32,
    pub write_timeout: MillisDurationU32,
}

impl TcpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn connect_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.connect_timeout = timeout;
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

type TcpChannel<const L: usize> = LineChannel<IoStream<TcpStream>, L>;

pub struct TcpTransport<const L: usize = 256> {
    config: TcpConfig,
    channel: Option<TcpChannel<L>>,
}

impl<const L: usize> TcpTransport<L> {
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            channel: None,
        }
    }

    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    fn channel(&mut self) -> Result<&mut TcpChannel<L>> {
        self.channel.as_mut().ok_or(Error::NotConnected)
    }

    fn open(&self) -> std::io::Result<TcpStream> {
        let config = &self.config;
        let connect_timeout = Duration::from_millis(u64::from(config.connect_timeout.to_millis()));

        let mut last_err = None;
        for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => {
                    let poll = poll_interval(config.read_timeout, config.write_timeout);
                    stream.set_read_timeout(Some(poll))?;
                    stream.set_write_timeout(Some(poll))?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("{} did not resolve", config.host),
            )
        }))
    }
}

impl<const L: usize> Transport for TcpTransport<L> {
    fn connect(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Err(Error::AlreadyConnected);
        }
        let stream = self.open().map_err(Error::Connect)?;
        self.channel = Some(LineChannel::new(
            IoStream(stream),
            self.config.read_timeout,
            self.config.write_timeout,
        ));
        log::info!("Connected to {}:{}", self.config.host, self.config.port);
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
        if let Some(channel) = self.channel.take() {
            let stream = channel.into_inner().0;
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                log::warn!("Ignoring shutdown failure on {}: {e}", self.config.host);
            }
            log::info!("Disconnected from {}:{}", self.config.host, self.config.port);
        }
    }
}

impl<const L: usize> Drop for TcpTransport<L> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
