//! Types related to pressure.

use core::fmt::{Debug, Display, Formatter};

/// An absolute pressure in Pascal.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pressure {
    pascal: i32,
}

impl Pressure {
    pub const fn from_pascal(pascal: i32) -> Self {
        Self { pascal }
    }

    pub const fn pascal(&self) -> i32 {
        self.pascal
    }
}

impl Debug for Pressure {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} Pa", self.pascal)
    }
}

impl Display for Pressure {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.pascal, f)
    }
}
