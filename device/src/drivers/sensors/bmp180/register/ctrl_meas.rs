use crate::traits::bus::RegisterBus;
use core::convert::TryFrom;

const CTRL_MEAS: u8 = 0xF4;

const START_TEMPERATURE: u8 = 0x2E;
const START_PRESSURE: u8 = 0x34;

/// Temperature conversion time in milliseconds.
const TEMPERATURE_SETTLING_MS: u32 = 5;

/// Pressure resolution (`oss`), trading conversion time for noise.
///
/// | Variant             | oss | Settling time | Raw bits |
/// |---------------------|-----|---------------|----------|
/// | UltraLowPower       | 0   | 5 ms          | 16       |
/// | Standard            | 1   | 8 ms          | 17       |
/// | HighResolution      | 2   | 14 ms         | 18       |
/// | UltraHighResolution | 3   | 26 ms         | 19       |
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Oversampling {
    UltraLowPower = 0,
    #[default]
    Standard = 1,
    HighResolution = 2,
    UltraHighResolution = 3,
}

impl Oversampling {
    pub const ALL: [Oversampling; 4] = [
        Oversampling::UltraLowPower,
        Oversampling::Standard,
        Oversampling::HighResolution,
        Oversampling::UltraHighResolution,
    ];

    /// The `oss` value, 0 to 3.
    pub const fn oss(self) -> u8 {
        self as u8
    }

    /// Minimum wait between starting a pressure conversion and reading the result.
    pub const fn settling_time_ms(self) -> u32 {
        2 + (3 << self.oss())
    }

    /// Right shift that turns the 24-bit result register into the raw pressure code.
    pub const fn raw_shift(self) -> u32 {
        8 - self.oss() as u32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidOversampling(pub u8);

impl TryFrom<u8> for Oversampling {
    type Error = InvalidOversampling;

    fn try_from(oss: u8) -> Result<Self, Self::Error> {
        match oss {
            0 => Ok(Oversampling::UltraLowPower),
            1 => Ok(Oversampling::Standard),
            2 => Ok(Oversampling::HighResolution),
            3 => Ok(Oversampling::UltraHighResolution),
            _ => Err(InvalidOversampling(oss)),
        }
    }
}

/// A conversion that can be started through the measurement control register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    Temperature,
    Pressure(Oversampling),
}

impl Measurement {
    pub const fn settling_time_ms(&self) -> u32 {
        match self {
            Measurement::Temperature => TEMPERATURE_SETTLING_MS,
            Measurement::Pressure(oss) => oss.settling_time_ms(),
        }
    }
}

impl From<Measurement> for u8 {
    fn from(measurement: Measurement) -> Self {
        match measurement {
            Measurement::Temperature => START_TEMPERATURE,
            Measurement::Pressure(oss) => START_PRESSURE + (oss.oss() << 6),
        }
    }
}

pub struct CtrlMeas;

impl CtrlMeas {
    pub const ADDRESS: u8 = CTRL_MEAS;

    /// Start a conversion. The result is valid after [`Measurement::settling_time_ms`].
    pub async fn start<B: RegisterBus>(
        bus: &mut B,
        measurement: Measurement,
    ) -> Result<(), B::Error> {
        bus.write_byte(CTRL_MEAS, measurement.into()).await
    }
}
