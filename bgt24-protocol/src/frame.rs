//! Frame encoding and integrity checking.
//!
//! Frame format:
//! - HEADER (1 byte): 0x55 synchronization byte
//! - ADDRESS (1 byte): 0x2A, the only device address the module answers to
//! - COMMAND (1 byte): command code, echoed back by the device
//! - LENGTH (2 bytes, big-endian): payload length + 2
//! - PAYLOAD (0-512 bytes): command-specific data
//! - CHECKSUM (2 bytes, big-endian): wrapping u16 sum of all preceding bytes

use heapless::Vec;

/// Frame synchronization byte
pub const HEADER: u8 = 0x55;

/// Fixed device address
pub const ADDRESS: u8 = 0x2A;

/// HEADER + ADDRESS + COMMAND
pub const PREFIX_LEN: usize = 3;

/// Width of the LENGTH field
pub const LENGTH_LEN: usize = 2;

/// Width of the CHECKSUM field
pub const CHECKSUM_LEN: usize = 2;

/// Maximum payload size in bytes (256 I/Q sample pairs)
pub const MAX_PAYLOAD_SIZE: usize = 512;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = PREFIX_LEN + LENGTH_LEN + MAX_PAYLOAD_SIZE + CHECKSUM_LEN;

/// Errors that can occur while building, scanning or decoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum on the wire does not match the recomputed sum
    InvalidChecksum { expected: u16, received: u16 },
    /// LENGTH field is impossible (below 2) or exceeds buffer capacity
    InvalidLength(u16),
    /// Payload is shorter than the command's field layout
    Truncated,
    /// Discrete field holds a code outside its documented range
    UnknownCode(u8),
    /// Frame carries a different command than the decoder expects
    UnexpectedCommand(u8),
    /// Request parameters rejected before transmission
    InvalidArgument,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Wrapping 16-bit additive checksum
pub fn checksum(bytes: &[u8]) -> u16 {
    sum_from(0, bytes)
}

fn sum_from(seed: u16, bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(seed, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// A request to send or a response as received
///
/// `length` and `checksum` hold the wire values. For frames built with
/// [`Frame::new`] they are always consistent; for scanned frames they are
/// whatever the device sent, and [`Frame::verify`] decides whether to trust
/// the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command code
    pub command: u8,
    /// LENGTH field
    pub length: u16,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// CHECKSUM field
    pub checksum: u16,
}

impl Frame {
    /// Create a frame with a correct LENGTH and CHECKSUM
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        let mut frame = Self {
            command,
            length: (payload.len() + CHECKSUM_LEN) as u16,
            payload: payload_vec,
            checksum: 0,
        };
        frame.checksum = frame.computed_checksum();
        Ok(frame)
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        let mut frame = Self {
            command,
            length: CHECKSUM_LEN as u16,
            payload: Vec::new(),
            checksum: 0,
        };
        frame.checksum = frame.computed_checksum();
        frame
    }

    /// Checksum over header, address, command, length and payload
    pub fn computed_checksum(&self) -> u16 {
        let [len_hi, len_lo] = self.length.to_be_bytes();
        let prefix = sum_from(0, &[HEADER, ADDRESS, self.command, len_hi, len_lo]);
        sum_from(prefix, &self.payload)
    }

    /// Check the wire checksum against the recomputed one
    pub fn verify(&self) -> Result<(), FrameError> {
        let expected = self.computed_checksum();
        if expected != self.checksum {
            return Err(FrameError::InvalidChecksum {
                expected,
                received: self.checksum,
            });
        }
        Ok(())
    }

    /// Total number of bytes this frame occupies on the wire
    pub fn wire_len(&self) -> usize {
        PREFIX_LEN + LENGTH_LEN + self.payload.len() + CHECKSUM_LEN
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.wire_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let body = PREFIX_LEN + LENGTH_LEN;
        buffer[0] = HEADER;
        buffer[1] = ADDRESS;
        buffer[2] = self.command;
        buffer[3..body].copy_from_slice(&self.length.to_be_bytes());
        buffer[body..body + self.payload.len()].copy_from_slice(&self.payload);
        buffer[frame_len - CHECKSUM_LEN..frame_len].copy_from_slice(&self.checksum.to_be_bytes());

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Big-endian u16 at `offset` within the payload
    pub fn payload_u16(&self, offset: usize) -> Result<u16, FrameError> {
        let bytes = self
            .payload
            .get(offset..offset + 2)
            .ok_or(FrameError::Truncated)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Big-endian u32 at `offset` within the payload
    pub fn payload_u32(&self, offset: usize) -> Result<u32, FrameError> {
        let bytes = self
            .payload
            .get(offset..offset + 4)
            .ok_or(FrameError::Truncated)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Byte at `offset` within the payload
    pub fn payload_u8(&self, offset: usize) -> Result<u8, FrameError> {
        self.payload.get(offset).copied().ok_or(FrameError::Truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(0xC1);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 7);
        assert_eq!(&buffer[..len], &[0x55, 0x2A, 0xC1, 0x00, 0x02, 0x01, 0x42]);
    }

    #[test]
    fn test_frame_encode_with_payload() {
        let frame = Frame::new(0xC3, &[0x02, 0x09, 0x01, 0x03]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(
            encoded.as_slice(),
            &[0x55, 0x2A, 0xC3, 0x00, 0x06, 0x02, 0x09, 0x01, 0x03, 0x01, 0x57]
        );
    }

    #[test]
    fn test_buffer_too_small() {
        let frame = Frame::new(0xC7, &[0, 0, 4, 0]).unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(0xC2, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_checksum_wraps() {
        // LENGTH is 0x0101; the sum of 255 bytes of 0xFF alone overflows u16
        let payload = [0xFFu8; 255];
        let frame = Frame::new(0xFF, &payload).unwrap();
        let expected = (0x55u32 + 0x2A + 0xFF + 0x01 + 0x01 + 255 * 0xFF) as u16;
        assert_eq!(frame.checksum, expected);
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_verify_rejects_bad_checksum() {
        let mut frame = Frame::new(0xC4, &[0x00, 0x64, 0x00, 0x0A]).unwrap();
        let good = frame.checksum;
        frame.checksum = good.wrapping_add(1);
        assert_eq!(
            frame.verify(),
            Err(FrameError::InvalidChecksum {
                expected: good,
                received: good.wrapping_add(1),
            })
        );
    }

    #[test]
    fn test_payload_accessors() {
        let frame = Frame::new(0xC8, &[0x12, 0x34, 0x56, 0x78]).unwrap();
        assert_eq!(frame.payload_u8(3), Ok(0x78));
        assert_eq!(frame.payload_u16(1), Ok(0x3456));
        assert_eq!(frame.payload_u32(0), Ok(0x1234_5678));
        assert_eq!(frame.payload_u16(3), Err(FrameError::Truncated));
        assert_eq!(frame.payload_u32(1), Err(FrameError::Truncated));
    }

    proptest! {
        #[test]
        fn prop_checksum_is_sum_of_preceding_bytes(
            command in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let frame = Frame::new(command, &payload).unwrap();
            let encoded = frame.encode_to_vec().unwrap();
            let split = encoded.len() - CHECKSUM_LEN;

            let sum = encoded[..split]
                .iter()
                .fold(0u32, |acc, &b| acc + b as u32) % 65536;
            let wire = u16::from_be_bytes([encoded[split], encoded[split + 1]]);

            prop_assert_eq!(sum as u16, wire);
        }

        #[test]
        fn prop_single_byte_corruption_detected(
            payload in proptest::collection::vec(any::<u8>(), 1..32),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut frame = Frame::new(0xC2, &payload).unwrap();
            let i = index.index(frame.payload.len());
            frame.payload[i] = frame.payload[i].wrapping_add(flip);

            let is_checksum_error = matches!(frame.verify(), Err(FrameError::InvalidChecksum { .. }));
            prop_assert!(is_checksum_error);
        }
    }
}
