//! Byte-stream frame recogniser
//!
//! The module's replies arrive on a stream that may hold leftovers of older
//! replies, line noise, or I/Q reports pushed in between. The scanner is fed
//! one byte at a time and locks onto the first `HEADER ADDRESS COMMAND`
//! prefix whose command matches the reply it was created for.
//!
//! A byte that breaks the prefix is consumed and the search restarts after
//! it; the only exception is a HEADER byte, which opens a new candidate.
//! Bytes already consumed are never re-examined, so a real frame whose
//! prefix overlaps a rejected candidate (or the body of a frame the scanner
//! locked onto) is missed.

use heapless::Vec;

use crate::command::{Command, ResponseShape};
use crate::frame::{Frame, FrameError, ADDRESS, CHECKSUM_LEN, HEADER, MAX_PAYLOAD_SIZE};

/// State machine that extracts one reply frame from a byte stream
#[derive(Debug, Clone)]
pub struct FrameScanner {
    command: Command,
    state: ScanState,
    length: u16,
    body_len: usize,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    checksum_hi: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Waiting for HEADER
    Header,
    /// Got HEADER, waiting for ADDRESS
    Address,
    /// Got ADDRESS, waiting for the expected command
    Command,
    /// Reading LENGTH high byte
    LengthHi,
    /// Reading LENGTH low byte
    LengthLo,
    /// Reading payload bytes
    Payload,
    /// Reading CHECKSUM high byte
    ChecksumHi,
    /// Reading CHECKSUM low byte
    ChecksumLo,
}

impl FrameScanner {
    /// Create a scanner for replies to `command`
    pub fn new(command: Command) -> Self {
        Self {
            command,
            state: ScanState::Header,
            length: 0,
            body_len: 0,
            payload: Vec::new(),
            checksum_hi: 0,
        }
    }

    /// Command this scanner is looking for
    pub fn expected(&self) -> Command {
        self.command
    }

    /// True while no candidate frame is in progress
    pub fn is_idle(&self) -> bool {
        self.state == ScanState::Header
    }

    /// Drop any partial candidate
    pub fn reset(&mut self) {
        self.state = ScanState::Header;
        self.length = 0;
        self.body_len = 0;
        self.payload.clear();
        self.checksum_hi = 0;
    }

    /// Feed a single byte to the scanner
    ///
    /// Returns `Ok(Some(frame))` once a complete frame has been assembled,
    /// `Ok(None)` when more bytes are needed, or `Err` when a candidate
    /// declares an impossible length. The returned frame's checksum has not
    /// been verified yet.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ScanState::Header => {
                // Silently discard anything that is not a frame start
                if byte == HEADER {
                    self.state = ScanState::Address;
                }
            }
            ScanState::Address => {
                self.state = match byte {
                    ADDRESS => ScanState::Command,
                    HEADER => ScanState::Address,
                    _ => ScanState::Header,
                };
            }
            ScanState::Command => {
                self.state = if byte == self.command.code() {
                    ScanState::LengthHi
                } else if byte == HEADER {
                    ScanState::Address
                } else {
                    ScanState::Header
                };
            }
            ScanState::LengthHi => {
                self.length = u16::from(byte) << 8;
                self.state = ScanState::LengthLo;
            }
            ScanState::LengthLo => {
                self.length |= u16::from(byte);
                self.body_len = match self.command.response_shape() {
                    ResponseShape::Fixed(width) => width,
                    ResponseShape::LengthPrefixed => {
                        let length = self.length;
                        let body = usize::from(length)
                            .checked_sub(CHECKSUM_LEN)
                            .filter(|&n| n <= MAX_PAYLOAD_SIZE);
                        match body {
                            Some(n) => n,
                            None => {
                                self.reset();
                                return Err(FrameError::InvalidLength(length));
                            }
                        }
                    }
                };
                self.payload.clear();
                self.state = if self.body_len == 0 {
                    ScanState::ChecksumHi
                } else {
                    ScanState::Payload
                };
            }
            ScanState::Payload => {
                // Capacity was checked against body_len when LENGTH arrived
                let _ = self.payload.push(byte);
                if self.payload.len() == self.body_len {
                    self.state = ScanState::ChecksumHi;
                }
            }
            ScanState::ChecksumHi => {
                self.checksum_hi = byte;
                self.state = ScanState::ChecksumLo;
            }
            ScanState::ChecksumLo => {
                let frame = Frame {
                    command: self.command.code(),
                    length: self.length,
                    payload: core::mem::take(&mut self.payload),
                    checksum: u16::from_be_bytes([self.checksum_hi, byte]),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed multiple bytes to the scanner
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::decode_target;
    use crate::types::TargetState;
    use proptest::prelude::*;

    fn with_checksum(bytes: &[u8]) -> std::vec::Vec<u8> {
        let mut out = bytes.to_vec();
        out.extend_from_slice(&crate::frame::checksum(bytes).to_be_bytes());
        out
    }

    #[test]
    fn test_scan_get_target_reply() {
        let data = with_checksum(&[0x55, 0x2A, 0xC1, 0x00, 0x00, 0x00, 0x1E, 0x02]);
        let mut scanner = FrameScanner::new(Command::GetTarget);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();

        assert_eq!(frame.command, 0xC1);
        assert_eq!(frame.payload.as_slice(), &[0x00, 0x1E, 0x02]);
        assert!(scanner.is_idle());

        let reading = decode_target(&frame).unwrap();
        assert_eq!(reading.speed, 30);
        assert_eq!(reading.state, TargetState::Approaching);
    }

    #[test]
    fn test_resync_after_noise() {
        let mut data = std::vec![0x00, 0x55];
        data.extend(with_checksum(&[0x55, 0x2A, 0xC1, 0x00, 0x05, 0x00, 0x1E, 0x02]));

        let mut scanner = FrameScanner::new(Command::GetTarget);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();
        assert_eq!(decode_target(&frame).unwrap().speed, 30);
    }

    #[test]
    fn test_skips_other_commands() {
        // A mode reply sits in front of the target reply
        let mut data = with_checksum(&[0x55, 0x2A, 0xC6, 0x00, 0x03, 0x00]);
        data.extend(with_checksum(&[0x55, 0x2A, 0xC1, 0x00, 0x05, 0x00, 0x07, 0x01]));

        let mut scanner = FrameScanner::new(Command::GetTarget);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();
        let reading = decode_target(&frame).unwrap();
        assert_eq!(reading.speed, 7);
        assert_eq!(reading.state, TargetState::Leaving);
    }

    #[test]
    fn test_wrong_address_is_consumed() {
        let mut scanner = FrameScanner::new(Command::GetTarget);
        assert_eq!(scanner.feed(0x55), Ok(None));
        assert!(!scanner.is_idle());
        assert_eq!(scanner.feed(0x2B), Ok(None));
        assert!(scanner.is_idle());
    }

    #[test]
    fn test_overlapping_frame_is_missed() {
        // The first candidate is truncated; its body swallows the prefix of
        // the real frame, which is then lost.
        let mut data = std::vec![0x55, 0x2A, 0xC1, 0x00, 0x05];
        data.extend(with_checksum(&[0x55, 0x2A, 0xC1, 0x00, 0x05, 0x00, 0x1E, 0x02]));

        let mut scanner = FrameScanner::new(Command::GetTarget);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();
        assert!(matches!(
            frame.verify(),
            Err(FrameError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn test_partial_frame_needs_more_bytes() {
        let data = with_checksum(&[0x55, 0x2A, 0xC8, 0x00, 0x06, 0x00, 0x00, 0x04, 0x00]);
        let mut scanner = FrameScanner::new(Command::GetThreshold);

        let (head, tail) = data.split_at(6);
        assert_eq!(scanner.feed_bytes(head), Ok(None));
        assert!(!scanner.is_idle());

        let frame = scanner.feed_bytes(tail).unwrap().unwrap();
        assert_eq!(frame.payload_u32(0), Ok(1024));
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_iq_frame_uses_length_field() {
        let data = with_checksum(&[0x55, 0x2A, 0xC2, 0x00, 0x06, 0x10, 0x20, 0x11, 0x21]);
        let mut scanner = FrameScanner::new(Command::IqAdc);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();

        assert_eq!(frame.length, 6);
        assert_eq!(frame.payload.as_slice(), &[0x10, 0x20, 0x11, 0x21]);
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_iq_empty_report() {
        let data = with_checksum(&[0x55, 0x2A, 0xC2, 0x00, 0x02]);
        let mut scanner = FrameScanner::new(Command::IqAdc);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();
        assert!(frame.payload.is_empty());
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_iq_oversized_length_rejected_before_body() {
        let mut scanner = FrameScanner::new(Command::IqAdc);
        assert_eq!(scanner.feed_bytes(&[0x55, 0x2A, 0xC2, 0xFF]), Ok(None));
        assert_eq!(scanner.feed(0xFF), Err(FrameError::InvalidLength(0xFFFF)));
        assert!(scanner.is_idle());
    }

    #[test]
    fn test_iq_length_below_checksum_rejected() {
        let mut scanner = FrameScanner::new(Command::IqAdc);
        assert_eq!(
            scanner.feed_bytes(&[0x55, 0x2A, 0xC2, 0x00, 0x01]),
            Err(FrameError::InvalidLength(1))
        );
    }

    #[test]
    fn test_iq_largest_accepted_length() {
        let mut header = std::vec![0x55, 0x2A, 0xC2];
        header.extend_from_slice(&((MAX_PAYLOAD_SIZE + CHECKSUM_LEN) as u16).to_be_bytes());
        header.extend(core::iter::repeat(0x80).take(MAX_PAYLOAD_SIZE));
        let data = with_checksum(&header);

        let mut scanner = FrameScanner::new(Command::IqAdc);
        let frame = scanner.feed_bytes(&data).unwrap().unwrap();
        assert_eq!(frame.payload.len(), MAX_PAYLOAD_SIZE);
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_reset_drops_candidate() {
        let mut scanner = FrameScanner::new(Command::GetMode);
        scanner.feed_bytes(&[0x55, 0x2A, 0xC6, 0x00]).unwrap();
        assert!(!scanner.is_idle());
        scanner.reset();
        assert!(scanner.is_idle());
        assert_eq!(scanner.expected(), Command::GetMode);
    }

    proptest! {
        #[test]
        fn prop_noise_without_header_is_skipped(
            noise in proptest::collection::vec(any::<u8>().prop_filter("not a header", |b| *b != HEADER), 0..64),
            speed in any::<u16>(),
            state in 0u8..=2,
        ) {
            let [hi, lo] = speed.to_be_bytes();
            let mut data = noise.clone();
            data.extend(with_checksum(&[0x55, 0x2A, 0xC1, 0x00, 0x05, hi, lo, state]));

            let mut scanner = FrameScanner::new(Command::GetTarget);
            for &byte in &noise {
                prop_assert_eq!(scanner.feed(byte), Ok(None));
                prop_assert!(scanner.is_idle());
            }

            let frame = scanner.feed_bytes(&data[noise.len()..]).unwrap().unwrap();
            let reading = decode_target(&frame).unwrap();
            prop_assert_eq!(reading.speed, speed);
            prop_assert_eq!(reading.state as u8, state);
        }
    }
}
