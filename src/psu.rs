use crate::{
    cancel::CancelToken,
    command::Command,
    error::Result,
    format::{format_number, normalize_bool, parse_number},
    transport::Transport,
    types::{Measurement, MeasurementInfo, State},
};

/// You can create a ScpiPsu using any [`Transport`].
///
/// For its methods, we generally use the nomenclature that "set" means to write a
/// configuration and "get" means to read back a configuration value. Whereas
/// "measure" means to read a measured value. Values are in volts, amps and watts.
///
/// Every method takes `&mut self`, so one client can only have one operation in
/// flight. The serial line cannot interleave requests: to share a supply between
/// threads, put the client behind a `Mutex`.
///
/// Operations check the client's [`CancelToken`] before touching the transport and
/// the transport checks it again while waiting on I/O.
pub struct ScpiPsu<T: Transport> {
    transport: T,
    cancel: CancelToken,
}

impl<T: Transport> ScpiPsu<T> {
    /// Create a new ScpiPsu around a transport, connected or not.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cancel: CancelToken::new(),
        }
    }

    /// Open the underlying channel.
    pub fn connect(&mut self) -> Result<()> {
        self.transport.connect()
    }

    /// Release the underlying channel.
    pub fn disconnect(&mut self) {
        self.transport.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// A handle which cancels this client's operations, usable from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Replace the cancel token, e.g. to carry on after a cancellation.
    pub fn set_cancel_token(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Read the identification string: vendor, model, serial number and firmware
    /// version. Returned verbatim.
    pub fn identify(&mut self) -> Result<String> {
        self.query(Command::Identify.as_ref())
    }

    /// Restore the power-on defaults.
    pub fn reset(&mut self) -> Result<()> {
        self.send(Command::Reset.as_ref())
    }

    /// Enable/disable the output.
    pub fn set_output(&mut self, state: impl Into<State>) -> Result<()> {
        self.send(&Command::Output.with_arg(state.into().as_str()))
    }

    /// Read whether the output is enabled.
    pub fn get_output(&mut self) -> Result<bool> {
        let reply = self.query(Command::OutputQuery.as_ref())?;
        Ok(normalize_bool(&reply))
    }

    /// Set the output voltage set point.
    pub fn set_voltage(&mut self, volts: f64) -> Result<()> {
        self.set_number(Command::Voltage, volts)
    }

    /// Get the output voltage set point.
    pub fn get_voltage(&mut self) -> Result<f64> {
        self.query_number(Command::VoltageQuery)
    }

    /// Set the over-voltage protection level.
    pub fn set_voltage_limit(&mut self, volts: f64) -> Result<()> {
        self.set_number(Command::VoltageLimit, volts)
    }

    /// Get the over-voltage protection level.
    pub fn get_voltage_limit(&mut self) -> Result<f64> {
        self.query_number(Command::VoltageLimitQuery)
    }

    /// Return the measured output voltage.
    pub fn measure_voltage(&mut self) -> Result<f64> {
        self.query_number(Command::MeasureVoltage)
    }

    /// Set the output current set point.
    pub fn set_current(&mut self, amps: f64) -> Result<()> {
        self.set_number(Command::Current, amps)
    }

    /// Get the output current set point.
    pub fn get_current(&mut self) -> Result<f64> {
        self.query_number(Command::CurrentQuery)
    }

    /// Set the over-current protection level.
    pub fn set_current_limit(&mut self, amps: f64) -> Result<()> {
        self.set_number(Command::CurrentLimit, amps)
    }

    /// Get the over-current protection level.
    pub fn get_current_limit(&mut self) -> Result<f64> {
        self.query_number(Command::CurrentLimitQuery)
    }

    /// Return the measured output current.
    pub fn measure_current(&mut self) -> Result<f64> {
        self.query_number(Command::MeasureCurrent)
    }

    /// Return the measured output power.
    pub fn measure_power(&mut self) -> Result<f64> {
        self.query_number(Command::MeasurePower)
    }

    /// Measure voltage, current and power in one round trip.
    ///
    /// Some firmware omits the power field, in which case power is reported as `0`.
    pub fn measure_all(&mut self) -> Result<Measurement> {
        self.query(Command::MeasureAll.as_ref())?.parse()
    }

    /// Measure voltage, current, power, protection flags and operating mode in one
    /// round trip.
    pub fn measure_all_info(&mut self) -> Result<MeasurementInfo> {
        self.query(Command::MeasureAllInfo.as_ref())?.parse()
    }

    /// Hand control back to the front panel.
    pub fn set_local(&mut self) -> Result<()> {
        self.send(Command::SystemLocal.as_ref())
    }

    /// Take remote control.
    pub fn set_remote(&mut self) -> Result<()> {
        self.send(Command::SystemRemote.as_ref())
    }

    /// Send a raw command line, no reply expected.
    pub fn send(&mut self, command: &str) -> Result<()> {
        self.cancel.check()?;
        self.transport.write_line(command, &self.cancel)
    }

    /// Send a raw query line and return the trimmed reply.
    pub fn query(&mut self, command: &str) -> Result<String> {
        self.cancel.check()?;
        self.transport.query_line(command, &self.cancel)
    }

    fn set_number(&mut self, command: Command, value: f64) -> Result<()> {
        let arg = format_number(value)?;
        self.send(&command.with_arg(&arg))
    }

    fn query_number(&mut self, command: Command) -> Result<f64> {
        let reply = self.query(command.as_ref())?;
        parse_number(&reply)
    }
}
