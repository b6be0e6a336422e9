#[cfg(feature = "std")]
mod tests {
    use bmp180_device::drivers::sensors::bmp180::Bmp180Error;
    use bmp180_device::node::{Bmp180Node, NodeError};
    use bmp180_device::testutil::*;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use embedded_io::{Error as _, ErrorKind};
    use embedded_io_async::Read;
    use futures::executor::block_on;

    type TestNode = Bmp180Node<NoopRawMutex, SimulatedBmp180, RecordingDelay>;

    const LINE: &str = "Temp: 15.0 C\nPressure: 69963 Pa\n";

    fn attached(bus: &SimulatedBmp180, delay: &RecordingDelay) -> TestNode {
        let node = TestNode::new();
        block_on(node.attach(bus.clone(), delay.clone())).unwrap();
        bus.clear_log();
        node
    }

    fn measurement_transfers() -> Vec<Transfer> {
        vec![
            Transfer::WriteByte(0xF4, 0x2E),
            Transfer::ReadByte(0xF6),
            Transfer::ReadByte(0xF7),
            Transfer::WriteByte(0xF4, 0x2E),
            Transfer::ReadByte(0xF6),
            Transfer::ReadByte(0xF7),
            Transfer::WriteByte(0xF4, 0xF4),
            Transfer::ReadBlock(0xF6, 3),
        ]
    }

    #[test]
    fn test_first_read_returns_line() {
        let bus = SimulatedBmp180::datasheet();
        let delay = RecordingDelay::new();
        let node = attached(&bus, &delay);
        let mut reader = node.open();

        let mut buf = [0; 128];
        let n = block_on(reader.read(&mut buf)).unwrap();
        assert_eq!(LINE.as_bytes(), &buf[..n]);
        assert_eq!(n, reader.offset());

        // ultra high resolution: temperature, then temperature and pressure
        assert_eq!(measurement_transfers(), bus.log());
        assert_eq!(vec![5, 5, 26], delay.delays());
    }

    #[test]
    fn test_second_read_is_end_of_file() {
        let bus = SimulatedBmp180::datasheet();
        let node = attached(&bus, &RecordingDelay::new());
        let mut reader = node.open();

        let mut buf = [0; 128];
        block_on(reader.read(&mut buf)).unwrap();
        bus.clear_log();

        assert_eq!(0, block_on(reader.read(&mut buf)).unwrap());
        assert!(bus.log().is_empty());
    }

    #[test]
    fn test_each_open_measures_again() {
        let bus = SimulatedBmp180::datasheet();
        let node = attached(&bus, &RecordingDelay::new());

        let mut buf = [0; 128];
        let n = block_on(node.open().read(&mut buf)).unwrap();
        assert_eq!(LINE.as_bytes(), &buf[..n]);

        bus.set_ut(15000);
        let n = block_on(node.open().read(&mut buf)).unwrap();
        let line = core::str::from_utf8(&buf[..n]).unwrap();
        assert!(line.starts_with("Temp: -29.8 C\nPressure: "));
        assert!(line.ends_with(" Pa\n"));
    }

    #[test]
    fn test_short_buffer_truncates() {
        let bus = SimulatedBmp180::datasheet();
        let node = attached(&bus, &RecordingDelay::new());
        let mut reader = node.open();

        let mut buf = [0; 10];
        assert_eq!(10, block_on(reader.read(&mut buf)).unwrap());
        assert_eq!(b"Temp: 15.0", &buf);
        assert_eq!(0, block_on(reader.read(&mut buf)).unwrap());
    }

    #[test]
    fn test_empty_buffer_does_not_measure() {
        let bus = SimulatedBmp180::datasheet();
        let delay = RecordingDelay::new();
        let node = attached(&bus, &delay);
        let mut reader = node.open();

        let mut empty = [0u8; 0];
        assert_eq!(0, block_on(reader.read(&mut empty)).unwrap());
        assert_eq!(0, reader.offset());
        assert!(bus.log().is_empty());
        assert!(delay.delays().is_empty());

        // the reader is still at the start of the line
        let mut buf = [0; 128];
        let n = block_on(reader.read(&mut buf)).unwrap();
        assert_eq!(LINE.as_bytes(), &buf[..n]);
    }

    #[test]
    fn test_read_without_sensor() {
        let node = TestNode::new();
        let mut buf = [0; 128];

        let err = block_on(node.open().read(&mut buf)).unwrap_err();
        assert_eq!(NodeError::NotAttached, err);
        assert_eq!(ErrorKind::NotConnected, err.kind());
        assert!(!block_on(node.is_attached()));
    }

    #[test]
    fn test_attach_twice() {
        let bus = SimulatedBmp180::datasheet();
        let node = attached(&bus, &RecordingDelay::new());

        let err = block_on(node.attach(bus.clone(), RecordingDelay::new())).unwrap_err();
        assert_eq!(NodeError::AlreadyAttached, err);
        assert_eq!(ErrorKind::AddrInUse, err.kind());
        // the existing sensor is left alone
        assert!(bus.log().is_empty());
        assert!(block_on(node.is_attached()));
    }

    #[test]
    fn test_attach_calibration_failure() {
        let bus = SimulatedBmp180::datasheet();
        bus.fail_read(0xBC);
        let node = TestNode::new();

        match block_on(node.attach(bus.clone(), RecordingDelay::new())) {
            Err(NodeError::Sensor(Bmp180Error::CalibrationRead { failed, .. })) => {
                assert_eq!(1 << 9, failed)
            }
            _ => panic!("expected calibration error"),
        }
        assert!(!block_on(node.is_attached()));

        bus.clear_faults();
        block_on(node.attach(bus, RecordingDelay::new())).unwrap();
        assert!(block_on(node.is_attached()));
    }

    #[test]
    fn test_failed_read_produces_no_output() {
        let bus = SimulatedBmp180::datasheet();
        let node = attached(&bus, &RecordingDelay::new());
        bus.fail(Transfer::ReadBlock(0xF6, 3));
        let mut reader = node.open();

        let mut buf = [0; 128];
        let err = block_on(reader.read(&mut buf)).unwrap_err();
        assert_eq!(
            NodeError::Sensor(Bmp180Error::BusRead(BusFault(Transfer::ReadBlock(0xF6, 3)))),
            err
        );
        assert_eq!(ErrorKind::Other, err.kind());
        assert_eq!(0, reader.offset());
        assert!(buf.iter().all(|b| *b == 0));

        // the offset did not move, so the same reader can try again
        bus.clear_faults();
        let n = block_on(reader.read(&mut buf)).unwrap();
        assert_eq!(LINE.as_bytes(), &buf[..n]);
    }

    #[test]
    fn test_detach() {
        let bus = SimulatedBmp180::datasheet();
        let node = attached(&bus, &RecordingDelay::new());

        let (released, _) = block_on(node.detach()).unwrap();
        assert!(!block_on(node.is_attached()));
        assert!(block_on(node.detach()).is_none());

        let mut buf = [0; 128];
        assert_eq!(
            NodeError::NotAttached,
            block_on(node.open().read(&mut buf)).unwrap_err()
        );

        // the released bus can be attached again
        block_on(node.attach(released, RecordingDelay::new())).unwrap();
        let n = block_on(node.open().read(&mut buf)).unwrap();
        assert_eq!(LINE.as_bytes(), &buf[..n]);
    }

    #[test]
    fn test_concurrent_readers_do_not_interleave() {
        let bus = SimulatedBmp180::datasheet();
        let delay = RecordingDelay::new();
        let node = attached(&bus, &delay);
        let mut first = node.open();
        let mut second = node.open();

        let mut a = [0; 128];
        let mut b = [0; 128];
        let (ra, rb) = block_on(join(first.read(&mut a), second.read(&mut b)));
        let (na, nb) = (ra.unwrap(), rb.unwrap());
        assert_eq!(LINE.as_bytes(), &a[..na]);
        assert_eq!(LINE.as_bytes(), &b[..nb]);

        let mut expected = measurement_transfers();
        expected.extend(measurement_transfers());
        assert_eq!(expected, bus.log());
        assert_eq!(vec![5, 5, 26, 5, 5, 26], delay.delays());
    }

    #[test]
    fn test_probe_over_i2c() {
        let mut expectations = Vec::new();
        for (n, word) in DATASHEET_CALIBRATION.iter().enumerate() {
            let reg = 0xAA + 2 * n as u8;
            let [msb, lsb] = word.to_be_bytes();
            expectations.push(I2cTransaction::write_read(0x77, vec![reg], vec![msb]));
            expectations.push(I2cTransaction::write_read(0x77, vec![reg + 1], vec![lsb]));
        }
        let [ut_msb, ut_lsb] = DATASHEET_UT.to_be_bytes();
        for _ in 0..2 {
            expectations.push(I2cTransaction::write(0x77, vec![0xF4, 0x2E]));
            expectations.push(I2cTransaction::write_read(0x77, vec![0xF6], vec![ut_msb]));
            expectations.push(I2cTransaction::write_read(0x77, vec![0xF7], vec![ut_lsb]));
        }
        expectations.push(I2cTransaction::write(0x77, vec![0xF4, 0xF4]));
        expectations.push(I2cTransaction::write_read(
            0x77,
            vec![0xF6],
            DATASHEET_UP_BYTES.to_vec(),
        ));

        let node = Bmp180Node::<NoopRawMutex, _, _>::new();
        block_on(node.probe(I2cMock::new(&expectations))).unwrap();

        let mut buf = [0; 128];
        let n = block_on(node.open().read(&mut buf)).unwrap();
        assert_eq!(LINE.as_bytes(), &buf[..n]);

        let (bus, _) = block_on(node.detach()).unwrap();
        bus.release().done();
    }
}
