//! Newline framed request/reply I/O over any [embedded_io] stream.

use std::time::{Duration, Instant};

use embedded_io::{Error as _, ErrorKind};
use fugit::MillisDurationU32;

use crate::{
    cancel::CancelToken,
    error::{Error, Result},
};

/// Line terminator appended to every command and expected after every reply.
pub const TERMINATOR: u8 = b'\n';

/// How long a single blocking read or write may park before we re-check the
/// deadline and the cancellation token. Transports configure their port with this.
pub const POLL_INTERVAL: MillisDurationU32 = MillisDurationU32::millis(50);

/// The poll interval to configure on a port, never longer than its timeouts.
pub(crate) fn poll_interval(
    read_timeout: MillisDurationU32,
    write_timeout: MillisDurationU32,
) -> Duration {
    let millis = POLL_INTERVAL
        .to_millis()
        .min(read_timeout.to_millis())
        .min(write_timeout.to_millis())
        .max(1);
    Duration::from_millis(u64::from(millis))
}

fn deadline_after(timeout: MillisDurationU32) -> Instant {
    Instant::now() + Duration::from_millis(u64::from(timeout.to_millis()))
}

/// Kinds which only mean "nothing happened during this poll".
fn is_idle(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::TimedOut | ErrorKind::Interrupted)
}

fn channel_fault<E: embedded_io::Error + Send + Sync + 'static>(err: E) -> Error {
    log::error!("Channel fault: {err}");
    Error::io(err)
}

fn end_of_stream() -> Error {
    log::error!("Channel closed by peer");
    Error::Io {
        kind: ErrorKind::ConnectionAborted,
        source: Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionAborted,
            "end of stream",
        )),
    }
}

/// Sends commands and reads replies one line at a time.
///
/// Replies are collected into a fixed `L` byte buffer. The stream is read a byte at
/// a time so nothing beyond the terminator is consumed.
pub struct LineChannel<S: embedded_io::Read + embedded_io::Write, const L: usize = 256> {
    stream: S,
    read_timeout: MillisDurationU32,
    write_timeout: MillisDurationU32,
}

impl<S, const L: usize> LineChannel<S, L>
where
    S: embedded_io::Read + embedded_io::Write,
    S::Error: Send + Sync + 'static,
{
    pub fn new(
        stream: S,
        read_timeout: MillisDurationU32,
        write_timeout: MillisDurationU32,
    ) -> Self {
        Self {
            stream,
            read_timeout,
            write_timeout,
        }
    }

    /// Send `command` followed by the terminator.
    pub fn write_line(&mut self, command: &str, cancel: &CancelToken) -> Result<()> {
        log::debug!("-> {command}");
        let deadline = deadline_after(self.write_timeout);
        self.write_all(command.as_bytes(), deadline, cancel)?;
        self.write_all(&[TERMINATOR], deadline, cancel)?;
        self.flush()
    }

    /// Read one reply line, without the terminator and surrounding whitespace.
    ///
    /// A line longer than `L` is consumed up to its terminator and then reported as
    /// [`Error::BufferOverflow`], so the next read starts on the next line.
    pub fn read_line(&mut self, cancel: &CancelToken) -> Result<String> {
        let deadline = deadline_after(self.read_timeout);
        let mut line: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut overflowed = false;
        let mut byte = [0u8; 1];

        loop {
            cancel.check()?;
            match self.stream.read(&mut byte) {
                Ok(0) => return Err(end_of_stream()),
                Ok(_) if byte[0] == TERMINATOR => break,
                Ok(_) => {
                    if line.push(byte[0]).is_err() && !overflowed {
                        log::warn!("Reply longer than {} bytes, discarding it", L);
                        overflowed = true;
                    }
                }
                Err(e) if is_idle(e.kind()) => {}
                Err(e) => return Err(channel_fault(e)),
            }
            if Instant::now() >= deadline {
                if overflowed {
                    return Err(Error::BufferOverflow);
                }
                return Err(Error::Timeout(self.read_timeout));
            }
        }

        if overflowed {
            return Err(Error::BufferOverflow);
        }

        let reply = match core::str::from_utf8(&line) {
            Ok(text) => text.trim().to_owned(),
            Err(_) => {
                return Err(Error::MalformedResponse(
                    String::from_utf8_lossy(&line).into_owned(),
                ));
            }
        };
        log::debug!("<- {reply}");
        Ok(reply)
    }

    /// Send `command` and wait for its reply line.
    pub fn query_line(&mut self, command: &str, cancel: &CancelToken) -> Result<String> {
        self.write_line(command, cancel)?;
        self.read_line(cancel)
    }

    /// Push out anything buffered by the stream.
    pub fn flush(&mut self) -> Result<()> {
        self.stream.flush().map_err(channel_fault)
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn write_all(&mut self, mut buf: &[u8], deadline: Instant, cancel: &CancelToken) -> Result<()> {
        while !buf.is_empty() {
            cancel.check()?;
            match self.stream.write(buf) {
                Ok(written) => buf = &buf[written..],
                Err(e) if is_idle(e.kind()) => {}
                Err(e) => return Err(channel_fault(e)),
            }
            if !buf.is_empty() && Instant::now() >= deadline {
                return Err(Error::Timeout(self.write_timeout));
            }
        }
        Ok(())
    }
}
