/// Register-level access to a device on a two-wire bus.
///
/// Every operation addresses a single device; the device address, if any, is held by the
/// implementation.
pub trait RegisterBus {
    type Error;

    /// Read a single register.
    async fn read_byte(&mut self, reg: u8) -> Result<u8, Self::Error>;

    /// Read `buf.len()` contiguous registers starting at `reg`.
    ///
    /// Returns the number of bytes actually transferred, which may be less than requested.
    async fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write a single register.
    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;

    /// Read a big-endian 16-bit value from `reg` (MSB) and `reg + 1` (LSB).
    ///
    /// Both registers are read even if the first read fails.
    async fn read_word(&mut self, reg: u8) -> Result<u16, Self::Error> {
        let msb = self.read_byte(reg).await;
        let lsb = self.read_byte(reg.wrapping_add(1)).await;
        Ok(u16::from_be_bytes([msb?, lsb?]))
    }
}

impl<T: RegisterBus> RegisterBus for &mut T {
    type Error = T::Error;

    async fn read_byte(&mut self, reg: u8) -> Result<u8, Self::Error> {
        T::read_byte(self, reg).await
    }

    async fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_block(self, reg, buf).await
    }

    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        T::write_byte(self, reg, value).await
    }

    async fn read_word(&mut self, reg: u8) -> Result<u16, Self::Error> {
        T::read_word(self, reg).await
    }
}
