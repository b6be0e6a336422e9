//! File-like access to an attached BMP180.
//!
//! A [`Bmp180Node`] owns the driver for as long as the sensor is attached. Readers opened on it
//! share the sensor through a mutex that is held for a whole measurement sequence, so
//! concurrent readers never interleave their conversions on the bus.

use crate::domain::Reading;
use crate::drivers::sensors::bmp180::{Bmp180, Bmp180Error, Oversampling};
use crate::traits::bus::RegisterBus;
use crate::traits::i2c::I2cRegisterBus;
use core::fmt::{Debug, Display, Formatter, Write};
use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use embedded_hal_async::delay::DelayNs;
use embedded_io::ErrorKind;

pub const NODE_NAME: &str = "bmp180";
pub const COMPATIBLE: &str = "bosch,bmp180";

/// Pressure resolution used for every read through a node.
pub const NODE_OVERSAMPLING: Oversampling = Oversampling::UltraHighResolution;

const LINE_CAPACITY: usize = 128;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeError<E> {
    Sensor(Bmp180Error<E>),
    /// No sensor is attached.
    NotAttached,
    /// A sensor is attached already.
    AlreadyAttached,
    /// The formatted reading did not fit the line buffer.
    LineTooLong,
}

impl<E> From<Bmp180Error<E>> for NodeError<E> {
    fn from(e: Bmp180Error<E>) -> Self {
        NodeError::Sensor(e)
    }
}

impl<E> Display for NodeError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            NodeError::Sensor(e) => Display::fmt(e, f),
            NodeError::NotAttached => f.write_str("no sensor attached"),
            NodeError::AlreadyAttached => f.write_str("sensor already attached"),
            NodeError::LineTooLong => f.write_str("reading does not fit the line buffer"),
        }
    }
}

impl<E: Debug> embedded_io::Error for NodeError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            NodeError::NotAttached => ErrorKind::NotConnected,
            NodeError::AlreadyAttached => ErrorKind::AddrInUse,
            NodeError::LineTooLong => ErrorKind::OutOfMemory,
            NodeError::Sensor(_) => ErrorKind::Other,
        }
    }
}

pub struct Bmp180Node<M: RawMutex, B, D> {
    sensor: Mutex<M, Option<Bmp180<B, D>>>,
}

impl<M: RawMutex, B, D> Bmp180Node<M, B, D> {
    pub const fn new() -> Self {
        Self {
            sensor: Mutex::new(None),
        }
    }
}

impl<M: RawMutex, B, D> Default for Bmp180Node<M, B, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, B, D> Bmp180Node<M, B, D>
where
    M: RawMutex,
    B: RegisterBus,
    D: DelayNs,
{
    /// Read the sensor's calibration and make it available to readers.
    ///
    /// On failure nothing is attached and `bus` and `delay` are dropped.
    pub async fn attach(&self, bus: B, delay: D) -> Result<(), NodeError<B::Error>> {
        let mut sensor = self.sensor.lock().await;
        if sensor.is_some() {
            warn!("{}: already attached", NODE_NAME);
            return Err(NodeError::AlreadyAttached);
        }

        sensor.replace(Bmp180::attach(bus, delay).await?);
        info!("{}: sensor attached, calibration loaded", NODE_NAME);
        Ok(())
    }

    /// Take the sensor out of the node and give back its bus and delay provider.
    pub async fn detach(&self) -> Option<(B, D)> {
        let sensor = self.sensor.lock().await.take()?;
        info!("{}: removed", NODE_NAME);
        Some(sensor.release())
    }

    pub async fn is_attached(&self) -> bool {
        self.sensor.lock().await.is_some()
    }

    /// Open a reader positioned at the start of the line.
    pub fn open(&self) -> Reader<'_, M, B, D> {
        Reader {
            node: self,
            offset: 0,
        }
    }

    async fn render(&self) -> Result<heapless::String<LINE_CAPACITY>, NodeError<B::Error>> {
        let mut guard = self.sensor.lock().await;
        let sensor = guard.as_mut().ok_or(NodeError::NotAttached)?;
        let reading = sensor.measure(NODE_OVERSAMPLING).await?;
        drop(guard);

        render_line(&reading).map_err(|_| {
            error!("{}: reading does not fit {} bytes", NODE_NAME, LINE_CAPACITY);
            NodeError::LineTooLong
        })
    }
}

// the longest possible line is 46 bytes
fn render_line<const N: usize>(
    reading: &Reading,
) -> Result<heapless::String<N>, core::fmt::Error> {
    let mut line = heapless::String::new();
    write!(line, "{}", reading)?;
    Ok(line)
}

impl<M, I> Bmp180Node<M, I2cRegisterBus<I>, embassy_time::Delay>
where
    M: RawMutex,
    I: embedded_hal_async::i2c::I2c,
{
    /// Attach a sensor found on `i2c` at the default address, timing conversions with the
    /// embassy timer.
    pub async fn probe(&self, i2c: I) -> Result<(), NodeError<I::Error>> {
        let bus = I2cRegisterBus::new(i2c);
        debug!("{}: probing at {:#x}", NODE_NAME, u8::from(bus.address()));
        self.attach(bus, embassy_time::Delay).await
    }
}

/// One open handle on a [`Bmp180Node`].
///
/// The first read measures the sensor and returns the formatted line, truncated to the buffer.
/// Any read after that returns 0, i.e. end-of-file.
pub struct Reader<'a, M: RawMutex, B, D> {
    node: &'a Bmp180Node<M, B, D>,
    offset: usize,
}

impl<'a, M: RawMutex, B, D> Reader<'a, M, B, D> {
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a, M, B, D> embedded_io::ErrorType for Reader<'a, M, B, D>
where
    M: RawMutex,
    B: RegisterBus,
    B::Error: Debug,
    D: DelayNs,
{
    type Error = NodeError<B::Error>;
}

impl<'a, M, B, D> embedded_io_async::Read for Reader<'a, M, B, D>
where
    M: RawMutex,
    B: RegisterBus,
    B::Error: Debug,
    D: DelayNs,
{
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.offset > 0 || buf.is_empty() {
            return Ok(0);
        }

        let line = self.node.render().await?;
        let len = buf.len().min(line.len());
        buf[..len].copy_from_slice(&line.as_bytes()[..len]);
        self.offset += len;
        Ok(len)
    }
}
