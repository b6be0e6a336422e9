use super::bus::RegisterBus;
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::i2c::I2c;

/// Default 7-bit address of the BMP180.
pub const DEFAULT_ADDRESS: u8 = 0x77;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddress(SevenBitAddress);

impl I2cAddress {
    pub const fn new(val: u8) -> Self {
        Self(val)
    }
}

impl From<I2cAddress> for u8 {
    fn from(address: I2cAddress) -> Self {
        address.0
    }
}

impl From<u8> for I2cAddress {
    fn from(val: u8) -> Self {
        I2cAddress::new(val)
    }
}

/// [`RegisterBus`] on top of an async I2C bus, using SMBus-style register transfers.
///
/// Register reads are a write of the register address followed by a repeated-start read,
/// register writes are a single two-byte write.
pub struct I2cRegisterBus<I> {
    i2c: I,
    address: I2cAddress,
}

impl<I: I2c> I2cRegisterBus<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, I2cAddress::new(DEFAULT_ADDRESS))
    }

    pub fn with_address(i2c: I, address: I2cAddress) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> I2cAddress {
        self.address
    }

    /// Give back the underlying bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for I2cRegisterBus<I> {
    type Error = I::Error;

    async fn read_byte(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let mut buf = [0; 1];
        self.i2c
            .write_read(self.address.into(), &[reg], &mut buf)
            .await?;
        Ok(buf[0])
    }

    async fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.write_read(self.address.into(), &[reg], buf).await?;
        Ok(buf.len())
    }

    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address.into(), &[reg, value]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use futures::executor::block_on;

    #[test]
    fn test_read_word_is_two_byte_reads() {
        let expectations = [
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xAA], vec![0x01]),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xAB], vec![0x98]),
        ];
        let mut bus = I2cRegisterBus::new(I2cMock::new(&expectations));
        assert_eq!(DEFAULT_ADDRESS, u8::from(bus.address()));

        assert_eq!(Ok(0x0198), block_on(bus.read_word(0xAA)));
        bus.release().done();
    }

    #[test]
    fn test_read_word_attempts_lsb_after_failed_msb() {
        let expectations = [
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xF6], vec![0x00])
                .with_error(ErrorKind::Other),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xF7], vec![0xFA]),
        ];
        let mut bus = I2cRegisterBus::new(I2cMock::new(&expectations));

        assert_eq!(Err(ErrorKind::Other), block_on(bus.read_word(0xF6)));
        bus.release().done();
    }

    #[test]
    fn test_block_read_and_write() {
        let expectations = [
            I2cTransaction::write(0x76, vec![0xF4, 0xF4]),
            I2cTransaction::write_read(0x76, vec![0xF6], vec![0x5D, 0x23, 0x00]),
        ];
        let mut bus = I2cRegisterBus::with_address(I2cMock::new(&expectations), 0x76.into());
        assert_eq!(I2cAddress::new(0x76), bus.address());

        assert_eq!(Ok(()), block_on(bus.write_byte(0xF4, 0xF4)));
        let mut buf = [0; 3];
        assert_eq!(Ok(3), block_on(bus.read_block(0xF6, &mut buf)));
        assert_eq!([0x5D, 0x23, 0x00], buf);
        bus.release().done();
    }
}
