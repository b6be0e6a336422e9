pub mod pressure;
pub mod temperature;

use core::fmt::{Debug, Display, Formatter};
use pressure::Pressure;
use temperature::Temperature;

/// One compensated sample of both quantities.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Reading {
    pub temperature: Temperature,
    pub pressure: Pressure,
}

impl Debug for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reading")
            .field("temperature", &self.temperature)
            .field("pressure", &self.pressure)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Reading {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "Reading(temperature: {}, pressure: {})",
            &self.temperature,
            &self.pressure
        );
    }
}

/// The line exposed by the device node:
///
/// ```text
/// Temp: 15.0 C
/// Pressure: 69964 Pa
/// ```
impl Display for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Temp: {} C\nPressure: {} Pa\n",
            self.temperature, self.pressure
        )
    }
}
