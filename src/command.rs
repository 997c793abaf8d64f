//! The SCPI mnemonics understood by the power supplies.

use strum_macros::{AsRefStr, Display, EnumIter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, AsRefStr, Display, EnumIter)]
pub enum Command {
    /// __Q__ - Identification: vendor, model, serial number and firmware version.
    #[strum(serialize = "*IDN?")]
    Identify,
    /// __W__ - Restore the power-on defaults.
    #[strum(serialize = "*RST")]
    Reset,
    /// __W__ - Output enable. Takes `ON` or `OFF`.
    #[strum(serialize = "OUTP")]
    Output,
    /// __Q__ - Output enable state.
    #[strum(serialize = "OUTP?")]
    OutputQuery,
    /// __W__ - Voltage set point, volts.
    #[strum(serialize = "VOLT")]
    Voltage,
    /// __Q__ - Voltage set point.
    #[strum(serialize = "VOLT?")]
    VoltageQuery,
    /// __W__ - Over-voltage protection level, volts.
    #[strum(serialize = "VOLT:LIM")]
    VoltageLimit,
    /// __Q__ - Over-voltage protection level.
    #[strum(serialize = "VOLT:LIM?")]
    VoltageLimitQuery,
    /// __Q__ - Measured output voltage.
    #[strum(serialize = "MEAS:VOLT?")]
    MeasureVoltage,
    /// __W__ - Current set point, amps.
    #[strum(serialize = "CURR")]
    Current,
    /// __Q__ - Current set point.
    #[strum(serialize = "CURR?")]
    CurrentQuery,
    /// __W__ - Over-current protection level, amps.
    #[strum(serialize = "CURR:LIM")]
    CurrentLimit,
    /// __Q__ - Over-current protection level.
    #[strum(serialize = "CURR:LIM?")]
    CurrentLimitQuery,
    /// __Q__ - Measured output current.
    #[strum(serialize = "MEAS:CURR?")]
    MeasureCurrent,
    /// __Q__ - Measured output power.
    #[strum(serialize = "MEAS:POW?")]
    MeasurePower,
    /// __Q__ - Voltage, current and (optionally) power in one reply.
    ///
    /// See [`Measurement`](crate::types::Measurement).
    #[strum(serialize = "MEAS:ALL?")]
    MeasureAll,
    /// __Q__ - Measurements plus protection flags and operating mode.
    ///
    /// See [`MeasurementInfo`](crate::types::MeasurementInfo).
    #[strum(serialize = "MEAS:ALL:INFO?")]
    MeasureAllInfo,
    /// __W__ - Hand control back to the front panel.
    #[strum(serialize = "SYST:LOC")]
    SystemLocal,
    /// __W__ - Take remote control, locking the front panel.
    #[strum(serialize = "SYST:REM")]
    SystemRemote,
}

impl Command {
    /// Queries elicit exactly one reply line.
    pub fn is_query(&self) -> bool {
        self.as_ref().ends_with('?')
    }

    /// The command line with a single space before the argument.
    pub fn with_arg(&self, arg: &str) -> String {
        format!("{} {}", self.as_ref(), arg)
    }
}
