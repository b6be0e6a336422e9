pub mod calibration;
pub mod ctrl_meas;
pub mod out;
