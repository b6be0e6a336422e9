#![macro_use]
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(async_fn_in_trait)]
//! An async, no-alloc driver for the Bosch BMP180 barometric pressure and temperature sensor.
//!
//! The driver talks to the sensor through a [`traits::bus::RegisterBus`], which is implemented
//! for any `embedded-hal-async` I2C bus by [`traits::i2c::I2cRegisterBus`]. Settling delays
//! are awaited through an `embedded-hal-async` delay, typically [`embassy_time::Delay`].
//!
//! All conversions from raw ADC codes to physical units use the integer-only compensation
//! formulas from the BMP180 datasheet.
//!
//! # Example
//!
//! ```ignore
//! use bmp180_device::drivers::sensors::bmp180::{Bmp180, Oversampling};
//! use bmp180_device::traits::i2c::I2cRegisterBus;
//!
//! let mut sensor = Bmp180::attach(I2cRegisterBus::new(i2c), embassy_time::Delay).await?;
//! let reading = sensor.measure(Oversampling::UltraHighResolution).await?;
//! info!("{}", reading);
//! ```
//!
//! # Device node
//!
//! [`node::Bmp180Node`] wraps an attached sensor behind a mutex and hands out
//! [`node::Reader`]s. The first read of a reader produces one text line with the current
//! temperature and pressure, every following read reports end-of-file.

pub(crate) mod fmt;

pub mod domain;

pub mod drivers;

pub mod node;

pub mod traits;

#[cfg(feature = "std")]
pub mod testutil;
