//! Types related to temperature.

use core::fmt::{Debug, Display, Formatter};

/// A temperature in tenths of a degree Celsius.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature {
    deci_celsius: i32,
}

impl Temperature {
    pub const fn from_deci_celsius(deci_celsius: i32) -> Self {
        Self { deci_celsius }
    }

    pub const fn deci_celsius(&self) -> i32 {
        self.deci_celsius
    }

    /// Whole degrees, truncated toward zero.
    pub const fn whole_degrees(&self) -> i32 {
        self.deci_celsius / 10
    }

    /// The tenths digit, always non-negative.
    pub const fn decile(&self) -> u8 {
        (self.deci_celsius % 10).unsigned_abs() as u8
    }
}

impl Debug for Temperature {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}°C", self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Temperature {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{}.{} C", self.whole_degrees(), self.decile())
    }
}

/// Renders as `<int>.<decile>`, e.g. `15.0` or `-29.8`.
///
/// The decile is always unsigned, so values between -0.9 and -0.1 have no sign: -0.5 reads `0.5`.
impl Display for Temperature {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.whole_degrees(), self.decile())
    }
}
