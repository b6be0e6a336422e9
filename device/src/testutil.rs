//! Simulated BMP180 and delay provider for driving the driver in tests.

use crate::traits::bus::RegisterBus;
use core::cell::RefCell;
use embedded_hal_async::delay::DelayNs;
use std::rc::Rc;
use std::vec::Vec;

const CALIBRATION_START: u8 = 0xAA;
const CTRL_MEAS: u8 = 0xF4;
const OUT_MSB: u8 = 0xF6;

/// Calibration words from the datasheet example, in register order.
pub const DATASHEET_CALIBRATION: [u16; 11] = [
    408,
    -72i16 as u16,
    -14383i16 as u16,
    32741,
    32757,
    23153,
    6190,
    4,
    -32768i16 as u16,
    -8711i16 as u16,
    2868,
];

/// `UT` from the datasheet example.
pub const DATASHEET_UT: u16 = 27898;

/// Result register contents for `UP = 23843` at oversampling 0.
pub const DATASHEET_UP_BYTES: [u8; 3] = [0x5D, 0x23, 0x00];

/// A single transfer seen by the simulated sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    ReadByte(u8),
    ReadBlock(u8, usize),
    WriteByte(u8, u8),
}

/// Error returned by the simulated sensor for an injected fault.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusFault(pub Transfer);

struct State {
    registers: [u8; 256],
    ut: u16,
    up: [u8; 3],
    faults: Vec<Transfer>,
    write_faults: Vec<u8>,
    block_limit: Option<usize>,
    log: Vec<Transfer>,
}

/// An in-memory BMP180 register file.
///
/// Writing a conversion command to the control register loads the configured raw value into
/// the result registers, like the real chip does once the conversion is done. Clones share the
/// same state, so a test can keep a handle for fault injection after moving the bus into the
/// driver.
#[derive(Clone)]
pub struct SimulatedBmp180 {
    state: Rc<RefCell<State>>,
}

impl SimulatedBmp180 {
    pub fn new(calibration: [u16; 11]) -> Self {
        let mut registers = [0; 256];
        for (n, word) in calibration.iter().enumerate() {
            let reg = CALIBRATION_START as usize + 2 * n;
            registers[reg..reg + 2].copy_from_slice(&word.to_be_bytes());
        }
        Self {
            state: Rc::new(RefCell::new(State {
                registers,
                ut: 0,
                up: [0; 3],
                faults: Vec::new(),
                write_faults: Vec::new(),
                block_limit: None,
                log: Vec::new(),
            })),
        }
    }

    /// A sensor loaded with the datasheet example values.
    pub fn datasheet() -> Self {
        let sensor = Self::new(DATASHEET_CALIBRATION);
        sensor.set_ut(DATASHEET_UT);
        sensor.set_up_bytes(DATASHEET_UP_BYTES);
        sensor
    }

    /// Raw temperature produced by the next temperature conversion.
    pub fn set_ut(&self, ut: u16) {
        self.state.borrow_mut().ut = ut;
    }

    /// Result register bytes produced by the next pressure conversion.
    pub fn set_up_bytes(&self, up: [u8; 3]) {
        self.state.borrow_mut().up = up;
    }

    /// Fail every transfer equal to `transfer`.
    pub fn fail(&self, transfer: Transfer) {
        self.state.borrow_mut().faults.push(transfer);
    }

    /// Fail every single-byte read of `reg`.
    pub fn fail_read(&self, reg: u8) {
        self.fail(Transfer::ReadByte(reg));
    }

    /// Fail every single-byte write to `reg`, whatever the value.
    pub fn fail_write(&self, reg: u8) {
        self.state.borrow_mut().write_faults.push(reg);
    }

    /// Deliver at most `limit` bytes on block reads.
    pub fn limit_block_reads(&self, limit: usize) {
        self.state.borrow_mut().block_limit.replace(limit);
    }

    pub fn clear_faults(&self) {
        let mut state = self.state.borrow_mut();
        state.faults.clear();
        state.write_faults.clear();
        state.block_limit = None;
    }

    /// All transfers so far, including failed ones.
    pub fn log(&self) -> Vec<Transfer> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    fn transfer(&self, transfer: Transfer) -> Result<(), BusFault> {
        let mut state = self.state.borrow_mut();
        state.log.push(transfer);
        let failed = state.faults.contains(&transfer)
            || matches!(transfer, Transfer::WriteByte(reg, _) if state.write_faults.contains(&reg));
        if failed {
            Err(BusFault(transfer))
        } else {
            Ok(())
        }
    }
}

impl RegisterBus for SimulatedBmp180 {
    type Error = BusFault;

    async fn read_byte(&mut self, reg: u8) -> Result<u8, Self::Error> {
        self.transfer(Transfer::ReadByte(reg))?;
        Ok(self.state.borrow().registers[reg as usize])
    }

    async fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.transfer(Transfer::ReadBlock(reg, buf.len()))?;
        let state = self.state.borrow();
        let start = reg as usize;
        let len = state
            .block_limit
            .unwrap_or(buf.len())
            .min(buf.len())
            .min(state.registers.len() - start);
        buf[..len].copy_from_slice(&state.registers[start..start + len]);
        Ok(len)
    }

    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.transfer(Transfer::WriteByte(reg, value))?;
        let mut state = self.state.borrow_mut();
        state.registers[reg as usize] = value;
        if reg == CTRL_MEAS {
            let out = OUT_MSB as usize;
            if value == 0x2E {
                let ut = state.ut.to_be_bytes();
                state.registers[out..out + 2].copy_from_slice(&ut);
            } else if (value & 0x3F) == 0x34 {
                let up = state.up;
                state.registers[out..out + 3].copy_from_slice(&up);
            }
        }
        Ok(())
    }
}

/// A delay provider that records every requested delay in milliseconds and yields once
/// instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    delays: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays.borrow_mut().push(ns / 1_000_000);
        embassy_futures::yield_now().await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.delays.borrow_mut().push(us / 1_000);
        embassy_futures::yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays.borrow_mut().push(ms);
        embassy_futures::yield_now().await;
    }
}
