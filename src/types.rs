//! Typed values exchanged with the power supply.

use core::str::FromStr;

use strum_macros::{Display, EnumIter};

use crate::{
    error::Error,
    format::{normalize_bool, parse_integer, parse_number, split_fields},
};

/// Used to be less ambiguous about whether something is on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Disabled.
    Off,
    /// Enabled.
    On,
}

impl State {
    /// The SCPI keyword for this state.
    pub const fn as_str(&self) -> &'static str {
        match self {
            State::Off => "OFF",
            State::On => "ON",
        }
    }
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        matches!(value, State::On)
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        if value { State::On } else { State::Off }
    }
}

/// Regulation state reported in the last field of `MEAS:ALL:INFO?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[repr(i32)]
pub enum OperatingMode {
    /// 0: Output off / idle.
    #[strum(serialize = "standby")]
    Standby = 0,
    /// 1: Constant voltage regulation.
    #[strum(serialize = "CV")]
    ConstantVoltage = 1,
    /// 2: Constant current regulation.
    #[strum(serialize = "CC")]
    ConstantCurrent = 2,
    /// 3: The supply has faulted.
    #[strum(serialize = "failure")]
    Failure = 3,
}

impl OperatingMode {
    /// The integer code used on the wire.
    pub const fn code(&self) -> i32 {
        *self as i32
    }
}

impl TryFrom<i32> for OperatingMode {
    /// Unknown codes are handed back unchanged.
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        use OperatingMode as OM;
        match value {
            0 => Ok(OM::Standby),
            1 => Ok(OM::ConstantVoltage),
            2 => Ok(OM::ConstantCurrent),
            3 => Ok(OM::Failure),
            other => Err(other),
        }
    }
}

/// Reply to `MEAS:ALL?`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Volts.
    pub voltage: f64,
    /// Amps.
    pub current: f64,
    /// Watts. Zero when the supply only reports voltage and current.
    pub power: f64,
}

impl FromStr for Measurement {
    type Err = Error;

    /// Needs at least voltage and current; anything after the third field is ignored.
    fn from_str(reply: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = split_fields(reply).collect();
        if fields.len() < 2 {
            return Err(Error::malformed(reply));
        }
        let power = match fields.get(2) {
            Some(field) => parse_number(field)?,
            None => 0.0,
        };
        Ok(Self {
            voltage: parse_number(fields[0])?,
            current: parse_number(fields[1])?,
            power,
        })
    }
}

/// Reply to `MEAS:ALL:INFO?`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementInfo {
    /// Volts.
    pub voltage: f64,
    /// Amps.
    pub current: f64,
    /// Watts.
    pub power: f64,
    /// OVP, over-voltage protection tripped.
    pub ovp_fault: bool,
    /// OCP, over-current protection tripped.
    pub ocp_fault: bool,
    /// OTP, over-temperature protection tripped.
    pub otp_fault: bool,
    /// Raw operating mode code. See [`MeasurementInfo::operating_mode`].
    pub mode: i32,
}

impl MeasurementInfo {
    /// Number of fields the reply must carry.
    const FIELD_COUNT: usize = 7;

    /// Interpret [`Self::mode`], returning the raw code if it is not one we know.
    pub fn operating_mode(&self) -> Result<OperatingMode, i32> {
        OperatingMode::try_from(self.mode)
    }

    /// Whether any protection has tripped.
    pub fn any_fault(&self) -> bool {
        self.ovp_fault || self.ocp_fault || self.otp_fault
    }
}

impl FromStr for MeasurementInfo {
    type Err = Error;

    fn from_str(reply: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = split_fields(reply).collect();
        if fields.len() < Self::FIELD_COUNT {
            return Err(Error::malformed(reply));
        }
        Ok(Self {
            voltage: parse_number(fields[0])?,
            current: parse_number(fields[1])?,
            power: parse_number(fields[2])?,
            ovp_fault: normalize_bool(fields[3]),
            ocp_fault: normalize_bool(fields[4]),
            otp_fault: normalize_bool(fields[5]),
            mode: parse_integer(fields[6])?,
        })
    }
}
