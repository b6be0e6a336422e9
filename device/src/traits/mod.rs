pub mod bus;
pub mod i2c;
pub mod sensors;
