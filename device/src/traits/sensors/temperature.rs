use crate::domain::temperature::Temperature;

pub trait TemperatureSensor {
    type Error;

    /// Take a fresh temperature measurement.
    async fn temperature(&mut self) -> Result<Temperature, Self::Error>;
}
