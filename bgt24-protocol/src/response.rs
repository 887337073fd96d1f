//! Reply decoding
//!
//! Every decoder checks the command echo and the checksum before touching
//! a single field, so a corrupted frame never yields a value.
//!
//! Payload layouts (offsets after the LENGTH field):
//!
//! | Reply | Fields |
//! |---|---|
//! | get-target | `[0..2]` speed, `[2]` target state |
//! | set/get speed scope | `[0..2]` max, `[2..4]` min |
//! | set/get mode | `[0]` mode |
//! | set/get threshold | `[0..4]` threshold |
//! | I/Q ADC | I, Q, I, Q, ... |
//!
//! All multi-byte fields are big-endian.

use crate::command::Command;
use crate::frame::{Frame, FrameError};
use crate::types::{DetectionMode, IqSamples, SpeedScope, TargetReading, TargetState};

/// Any decoded reply
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Get-target reply
    Target(TargetReading),
    /// Set- or get-speed-scope reply
    SpeedScope(SpeedScope),
    /// Set- or get-mode reply
    Mode(DetectionMode),
    /// Set- or get-threshold reply
    Threshold(u32),
    /// I/Q ADC report
    IqAdc(IqSamples),
}

impl Response {
    /// Decode a frame according to its command byte
    pub fn decode(frame: &Frame) -> Result<Self, FrameError> {
        let command =
            Command::from_code(frame.command).ok_or(FrameError::UnexpectedCommand(frame.command))?;
        match command {
            Command::GetTarget => decode_target(frame).map(Self::Target),
            Command::IqAdc => decode_iq_adc(frame).map(Self::IqAdc),
            Command::SetSpeedScope | Command::GetSpeedScope => {
                decode_speed_scope(frame).map(Self::SpeedScope)
            }
            Command::SetMode | Command::GetMode => decode_mode(frame).map(Self::Mode),
            Command::SetThreshold | Command::GetThreshold => {
                decode_threshold(frame).map(Self::Threshold)
            }
        }
    }
}

fn check(frame: &Frame, accepted: &[Command]) -> Result<(), FrameError> {
    if !accepted.iter().any(|c| c.code() == frame.command) {
        return Err(FrameError::UnexpectedCommand(frame.command));
    }
    frame.verify()
}

/// Decode a get-target reply
pub fn decode_target(frame: &Frame) -> Result<TargetReading, FrameError> {
    check(frame, &[Command::GetTarget])?;
    let speed = frame.payload_u16(0)?;
    let state = TargetState::from_code(frame.payload_u8(2)?)?;
    Ok(TargetReading { state, speed })
}

/// Decode a set- or get-speed-scope reply
pub fn decode_speed_scope(frame: &Frame) -> Result<SpeedScope, FrameError> {
    check(frame, &[Command::SetSpeedScope, Command::GetSpeedScope])?;
    // Reported as-is, even if the module holds an inverted window
    Ok(SpeedScope {
        max: frame.payload_u16(0)?,
        min: frame.payload_u16(2)?,
    })
}

/// Decode a set- or get-mode reply
pub fn decode_mode(frame: &Frame) -> Result<DetectionMode, FrameError> {
    check(frame, &[Command::SetMode, Command::GetMode])?;
    DetectionMode::from_code(frame.payload_u8(0)?)
}

/// Decode a set- or get-threshold reply
pub fn decode_threshold(frame: &Frame) -> Result<u32, FrameError> {
    check(frame, &[Command::SetThreshold, Command::GetThreshold])?;
    frame.payload_u32(0)
}

/// Decode an I/Q ADC report
///
/// A trailing unpaired byte is dropped.
pub fn decode_iq_adc(frame: &Frame) -> Result<IqSamples, FrameError> {
    check(frame, &[Command::IqAdc])?;

    let mut samples = IqSamples::default();
    for pair in frame.payload.chunks_exact(2) {
        samples.i.push(pair[0]).map_err(|_| FrameError::PayloadTooLarge)?;
        samples.q.push(pair[1]).map_err(|_| FrameError::PayloadTooLarge)?;
    }
    Ok(samples)
}
