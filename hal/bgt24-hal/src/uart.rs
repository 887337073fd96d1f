//! Serial transport abstraction
//!
//! The radar module talks over a plain UART. The driver only needs to push
//! request bytes out and pull response bytes in one at a time, checking
//! whether anything is pending before each pull.

/// Byte-oriented duplex serial channel
///
/// `read` never blocks: it returns `Ok(None)` when no byte is pending.
/// Waiting is the caller's job, using a [`Clock`](crate::Clock) to bound it.
pub trait SerialPort {
    /// Error type for transport operations
    type Error;

    /// Write all of `data` to the transmit side
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Take the next received byte, if one is pending
    fn read(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Number of received bytes ready to be read
    ///
    /// Implementations that cannot count may report `1` whenever at least
    /// one byte is pending.
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Block until all written data has left the transmitter
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn read(&mut self) -> Result<Option<u8>, Self::Error> {
        T::read(self)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        T::available(self)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

/// UART configuration
///
/// The defaults are the line settings the radar module ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// Time on the wire for one character, in microseconds (rounded up)
    ///
    /// Useful for sizing the inter-byte timeout of the driver.
    pub fn char_time_us(&self) -> u32 {
        let bits = 1 + self.data_bits.count() + self.parity.count() + self.stop_bits.count();
        let baud = self.baudrate.max(1);
        (bits * 1_000_000).div_ceil(baud)
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

impl DataBits {
    fn count(self) -> u32 {
        match self {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl Parity {
    fn count(self) -> u32 {
        match self {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    fn count(self) -> u32 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}
