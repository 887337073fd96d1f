//! `SerialPort` adapter for `embedded-io` UARTs
//!
//! Most HALs (embassy-rp `BufferedUart`, embassy-stm32, esp-hal, ...) expose
//! their UARTs through the `embedded-io` traits. `ReadReady` gives us the
//! non-blocking "is anything pending" check the driver polls with.

use embedded_io::{Read, ReadReady, Write};

use crate::uart::SerialPort;

/// Wraps an `embedded-io` UART as a [`SerialPort`]
pub struct IoSerial<T> {
    inner: T,
}

impl<T> IoSerial<T> {
    /// Wrap a UART
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped UART
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Release the wrapped UART
    pub fn free(self) -> T {
        self.inner
    }
}

impl<T> SerialPort for IoSerial<T>
where
    T: Read + Write + ReadReady,
{
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn read(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        // embedded-io cannot count pending bytes
        Ok(usize::from(self.inner.read_ready()?))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockError;

    impl embedded_io::Error for MockError {
        fn kind(&self) -> embedded_io::ErrorKind {
            embedded_io::ErrorKind::Other
        }
    }

    #[derive(Default)]
    struct MockUart {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        flushed: bool,
    }

    impl embedded_io::ErrorType for MockUart {
        type Error = MockError;
    }

    impl Read for MockUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl ReadReady for MockUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for MockUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_read_returns_none_when_idle() {
        let mut serial = IoSerial::new(MockUart::default());
        assert_eq!(serial.available(), Ok(0));
        assert_eq!(serial.read(), Ok(None));
    }

    #[test]
    fn test_read_one_byte_at_a_time() {
        let mut uart = MockUart::default();
        uart.rx.extend([0x55, 0x2A]);
        let mut serial = IoSerial::new(uart);

        assert_eq!(serial.available(), Ok(1));
        assert_eq!(serial.read(), Ok(Some(0x55)));
        assert_eq!(serial.read(), Ok(Some(0x2A)));
        assert_eq!(serial.read(), Ok(None));
    }

    #[test]
    fn test_write_and_flush() {
        let mut serial = IoSerial::new(MockUart::default());
        serial.write(&[0x55, 0x2A, 0xC1]).unwrap();
        serial.flush().unwrap();

        let uart = serial.free();
        assert_eq!(uart.tx, [0x55, 0x2A, 0xC1]);
        assert!(uart.flushed);
    }
}
