use super::ctrl_meas::Oversampling;
use crate::traits::bus::RegisterBus;

// OUT_MSB, OUT_LSB, OUT_XLSB
const OUT_MSB: u8 = 0xF6;

/// Uncompensated temperature code (`UT`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTemperature(pub i16);

/// Uncompensated pressure code (`UP`), 16 to 19 bits depending on the oversampling setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPressure(pub u32);

impl RawPressure {
    /// Assemble the code from `OUT_MSB`, `OUT_LSB` and `OUT_XLSB`.
    pub fn from_be_bytes(bytes: [u8; 3], oss: Oversampling) -> Self {
        let [msb, lsb, xlsb] = bytes;
        let out = (u32::from(msb) << 16) | (u32::from(lsb) << 8) | u32::from(xlsb);
        RawPressure(out >> oss.raw_shift())
    }
}

pub struct Out;

impl Out {
    pub const ADDRESS: u8 = OUT_MSB;

    pub async fn read_temperature<B: RegisterBus>(bus: &mut B) -> Result<RawTemperature, B::Error> {
        let word = bus.read_word(OUT_MSB).await?;
        Ok(RawTemperature(word as i16))
    }

    /// Block-read the three result bytes. Returns the number of bytes the bus delivered.
    pub async fn read_pressure_bytes<B: RegisterBus>(
        bus: &mut B,
        buf: &mut [u8; 3],
    ) -> Result<usize, B::Error> {
        bus.read_block(OUT_MSB, buf).await
    }
}
