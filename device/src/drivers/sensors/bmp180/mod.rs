mod register;

use crate::domain::{pressure::Pressure, temperature::Temperature, Reading};
use crate::traits::bus::RegisterBus;
use crate::traits::sensors::{pressure::PressureSensor, temperature::TemperatureSensor};
use core::fmt::{Display, Formatter};
use embedded_hal_async::delay::DelayNs;
use register::ctrl_meas::{CtrlMeas, Measurement};
use register::out::Out;

pub use register::calibration::Calibration;
pub use register::ctrl_meas::{InvalidOversampling, Oversampling};
pub use register::out::{RawPressure, RawTemperature};

/// 7-bit I2C address of the BMP180.
pub const ADDR: u8 = 0x77;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp180Error<E> {
    /// Reading a result register failed.
    BusRead(E),
    /// Writing the measurement control register failed.
    BusWrite(E),
    /// One or more calibration words could not be read. `failed` has bit `n` set for the `n`th
    /// word (AC1 = bit 0, MD = bit 10), `source` is the first bus error.
    CalibrationRead { failed: u16, source: E },
    /// A block read returned fewer bytes than requested.
    InsufficientBlockData { expected: usize, actual: usize },
}

impl<E> Display for Bmp180Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Bmp180Error::BusRead(_) => f.write_str("bus read failed"),
            Bmp180Error::BusWrite(_) => f.write_str("bus write failed"),
            Bmp180Error::CalibrationRead { failed, .. } => write!(
                f,
                "failed to read calibration data ({} of 11 words, mask {:#05x})",
                failed.count_ones(),
                failed
            ),
            Bmp180Error::InsufficientBlockData { expected, actual } => write!(
                f,
                "block read returned {} of {} bytes",
                actual, expected
            ),
        }
    }
}

/// BMP180 driver.
///
/// Holds the register bus, a delay provider for conversion times, and the calibration read
/// when the sensor was attached. Each measurement is a complete trigger, wait, read sequence;
/// nothing is cached between calls.
pub struct Bmp180<B, D> {
    bus: B,
    delay: D,
    calibration: Calibration,
    oversampling: Oversampling,
}

impl<B, D> Bmp180<B, D>
where
    B: RegisterBus,
    D: DelayNs,
{
    /// Read the calibration coefficients and return a ready driver.
    pub async fn attach(mut bus: B, delay: D) -> Result<Self, Bmp180Error<B::Error>> {
        let calibration = match Calibration::read(&mut bus).await {
            Ok(calibration) => calibration,
            Err(e) => {
                if let Bmp180Error::CalibrationRead { failed, .. } = &e {
                    error!("Failed to read calibration data (mask {:#x})", failed);
                }
                return Err(e);
            }
        };
        debug!("Calibration loaded: {:?}", calibration);

        Ok(Self {
            bus,
            delay,
            calibration,
            oversampling: Oversampling::default(),
        })
    }

    /// Give back the bus and delay provider.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Oversampling used by [`PressureSensor::pressure`].
    pub fn oversampling(&self) -> Oversampling {
        self.oversampling
    }

    pub fn set_oversampling(&mut self, oversampling: Oversampling) {
        self.oversampling = oversampling;
    }

    /// Start a temperature conversion, wait for it and read `UT`.
    pub async fn read_raw_temperature(&mut self) -> Result<RawTemperature, Bmp180Error<B::Error>> {
        self.start(Measurement::Temperature).await?;

        let ut = Out::read_temperature(&mut self.bus).await.map_err(|e| {
            warn!("Failed to read temperature from register {:#x}", Out::ADDRESS);
            Bmp180Error::BusRead(e)
        })?;
        trace!("UT = {}", ut.0);
        Ok(ut)
    }

    /// Measure `UT`, then start a pressure conversion at `oss`, wait for it and read `UP`.
    pub async fn read_raw_pressure(
        &mut self,
        oss: Oversampling,
    ) -> Result<(RawTemperature, RawPressure), Bmp180Error<B::Error>> {
        let ut = self.read_raw_temperature().await?;

        self.start(Measurement::Pressure(oss)).await?;

        let mut buf = [0; 3];
        let read = Out::read_pressure_bytes(&mut self.bus, &mut buf)
            .await
            .map_err(|e| {
                warn!("Failed to read pressure from register {:#x}", Out::ADDRESS);
                Bmp180Error::BusRead(e)
            })?;
        if read < buf.len() {
            warn!("Pressure block read returned {} of {} bytes", read, buf.len());
            return Err(Bmp180Error::InsufficientBlockData {
                expected: buf.len(),
                actual: read,
            });
        }

        let up = RawPressure::from_be_bytes(buf, oss);
        trace!("UP = {} (oss {})", up.0, oss.oss());
        Ok((ut, up))
    }

    pub async fn measure_temperature(&mut self) -> Result<Temperature, Bmp180Error<B::Error>> {
        let ut = self.read_raw_temperature().await?;
        Ok(self.calibration.calibrated_temperature(ut))
    }

    /// Pressure always comes with a fresh temperature measurement, the compensation needs it.
    pub async fn measure_pressure(
        &mut self,
        oss: Oversampling,
    ) -> Result<Pressure, Bmp180Error<B::Error>> {
        let (ut, up) = self.read_raw_pressure(oss).await?;
        Ok(self.calibration.calibrated_pressure(ut, up, oss))
    }

    /// A temperature measurement followed by a pressure measurement at `oss`.
    pub async fn measure(&mut self, oss: Oversampling) -> Result<Reading, Bmp180Error<B::Error>> {
        let temperature = self.measure_temperature().await?;
        let pressure = self.measure_pressure(oss).await?;
        let reading = Reading {
            temperature,
            pressure,
        };
        debug!("{:?}", reading);
        Ok(reading)
    }

    async fn start(&mut self, measurement: Measurement) -> Result<(), Bmp180Error<B::Error>> {
        CtrlMeas::start(&mut self.bus, measurement)
            .await
            .map_err(|e| {
                warn!("Failed to write register {:#x}", CtrlMeas::ADDRESS);
                Bmp180Error::BusWrite(e)
            })?;
        self.delay.delay_ms(measurement.settling_time_ms()).await;
        Ok(())
    }
}

impl<B, D> TemperatureSensor for Bmp180<B, D>
where
    B: RegisterBus,
    D: DelayNs,
{
    type Error = Bmp180Error<B::Error>;

    async fn temperature(&mut self) -> Result<Temperature, Self::Error> {
        self.measure_temperature().await
    }
}

impl<B, D> PressureSensor for Bmp180<B, D>
where
    B: RegisterBus,
    D: DelayNs,
{
    type Error = Bmp180Error<B::Error>;

    async fn pressure(&mut self) -> Result<Pressure, Self::Error> {
        self.measure_pressure(self.oversampling).await
    }
}
