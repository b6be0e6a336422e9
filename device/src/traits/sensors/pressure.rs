use crate::domain::pressure::Pressure;

pub trait PressureSensor {
    type Error;

    /// Take a fresh pressure measurement, at whatever resolution the sensor is configured for.
    async fn pressure(&mut self) -> Result<Pressure, Self::Error>;
}
