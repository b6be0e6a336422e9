use super::ctrl_meas::Oversampling;
use super::out::{RawPressure, RawTemperature};
use crate::domain::{pressure::Pressure, temperature::Temperature};
use crate::drivers::sensors::bmp180::Bmp180Error;
use crate::traits::bus::RegisterBus;

// 11 big-endian words from 0xAA to 0xBF, in datasheet order
const CALIBRATION: [u8; 11] = [
    0xAA, 0xAC, 0xAE, 0xB0, 0xB2, 0xB4, 0xB6, 0xB8, 0xBA, 0xBC, 0xBE,
];

/// Factory calibration coefficients (datasheet section 3.5).
///
/// Read once when the sensor is attached and never modified afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    ac1: i16,
    ac2: i16,
    ac3: i16,
    ac4: u16,
    ac5: u16,
    ac6: u16,
    b1: i16,
    b2: i16,
    mb: i16,
    mc: i16,
    md: i16,
}

impl Calibration {
    /// Read all coefficients.
    ///
    /// Every word is read even after a failure. If any read failed, the error carries a mask of
    /// the failed words (bit `n` for the `n`th word, starting at `AC1`) and the first bus error.
    pub async fn read<B: RegisterBus>(bus: &mut B) -> Result<Calibration, Bmp180Error<B::Error>> {
        let mut words = [0u16; 11];
        let mut failed = 0u16;
        let mut source = None;

        for (n, (reg, word)) in CALIBRATION.iter().zip(words.iter_mut()).enumerate() {
            match bus.read_word(*reg).await {
                Ok(value) => *word = value,
                Err(e) => {
                    warn!("calibration word read failed at register {:#x}", reg);
                    failed |= 1 << n;
                    source.get_or_insert(e);
                }
            }
        }

        match source {
            Some(source) => Err(Bmp180Error::CalibrationRead { failed, source }),
            None => Ok(words.into()),
        }
    }

    pub fn ac1(&self) -> i16 {
        self.ac1
    }

    pub fn ac2(&self) -> i16 {
        self.ac2
    }

    pub fn ac3(&self) -> i16 {
        self.ac3
    }

    pub fn ac4(&self) -> u16 {
        self.ac4
    }

    pub fn ac5(&self) -> u16 {
        self.ac5
    }

    pub fn ac6(&self) -> u16 {
        self.ac6
    }

    pub fn b1(&self) -> i16 {
        self.b1
    }

    pub fn b2(&self) -> i16 {
        self.b2
    }

    pub fn mb(&self) -> i16 {
        self.mb
    }

    pub fn mc(&self) -> i16 {
        self.mc
    }

    pub fn md(&self) -> i16 {
        self.md
    }

    /// The intermediate `B5` shared by the temperature and pressure formulas.
    ///
    /// # Panics
    ///
    /// If `X1 + MD` is zero, which factory-programmed coefficients never produce.
    pub fn b5(&self, ut: RawTemperature) -> i32 {
        let ut = i32::from(ut.0);
        let x1 = ut
            .wrapping_sub(i32::from(self.ac6))
            .wrapping_mul(i32::from(self.ac5))
            >> 15;
        let x2 = (i32::from(self.mc) << 11).wrapping_div(x1.wrapping_add(i32::from(self.md)));
        x1.wrapping_add(x2)
    }

    /// True temperature in 0.1 °C.
    pub fn calibrated_temperature(&self, ut: RawTemperature) -> Temperature {
        Temperature::from_deci_celsius(self.b5(ut).wrapping_add(8) >> 4)
    }

    /// True pressure in Pa.
    ///
    /// `ut` is the temperature code measured right before `up`. `B5` is recomputed from it.
    ///
    /// # Panics
    ///
    /// If `B4` or `X1 + MD` is zero, which factory-programmed coefficients never produce.
    pub fn calibrated_pressure(
        &self,
        ut: RawTemperature,
        up: RawPressure,
        oss: Oversampling,
    ) -> Pressure {
        let oss = u32::from(oss.oss());

        let b6 = self.b5(ut).wrapping_sub(4000);
        let b6_sq = b6.wrapping_mul(b6) >> 12;

        let x1 = i32::from(self.b2).wrapping_mul(b6_sq) >> 11;
        let x2 = i32::from(self.ac2).wrapping_mul(b6) >> 11;
        let x3 = x1.wrapping_add(x2);
        let b3 = i32::from(self.ac1).wrapping_mul(4).wrapping_add(x3) << oss;
        let b3 = b3.wrapping_add(2) >> 2;

        let x1 = i32::from(self.ac3).wrapping_mul(b6) >> 13;
        let x2 = i32::from(self.b1).wrapping_mul(b6_sq) >> 16;
        let x3 = x1.wrapping_add(x2).wrapping_add(2) >> 2;

        // B4 and B7 are unsigned 32-bit quantities; B3 and X3 are reinterpreted, not converted.
        let b4 = u32::from(self.ac4).wrapping_mul(x3.wrapping_add(32768) as u32) >> 15;
        let b7 = up.0.wrapping_sub(b3 as u32).wrapping_mul(50000 >> oss);

        // B7 << 1 would overflow from 2^31 on, so divide first there
        let p = if b7 < 0x8000_0000 {
            (b7 << 1) / b4
        } else {
            (b7 / b4) << 1
        };
        let p = p as i32;

        let x1 = (p >> 8).wrapping_mul(p >> 8);
        let x1 = x1.wrapping_mul(3038) >> 16;
        let x2 = (-7357i32).wrapping_mul(p) >> 16;

        Pressure::from_pascal(p.wrapping_add(x1.wrapping_add(x2).wrapping_add(3791) >> 4))
    }
}

impl From<[u16; 11]> for Calibration {
    /// Words in register order: AC1, AC2, AC3, AC4, AC5, AC6, B1, B2, MB, MC, MD.
    fn from(words: [u16; 11]) -> Calibration {
        let [ac1, ac2, ac3, ac4, ac5, ac6, b1, b2, mb, mc, md] = words;
        Calibration {
            ac1: ac1 as i16,
            ac2: ac2 as i16,
            ac3: ac3 as i16,
            ac4,
            ac5,
            ac6,
            b1: b1 as i16,
            b2: b2 as i16,
            mb: mb as i16,
            mc: mc as i16,
            md: md as i16,
        }
    }
}
