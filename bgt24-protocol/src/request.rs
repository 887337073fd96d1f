//! Request frame construction

use heapless::Vec;

use crate::command::{Command, RequestTemplate};
use crate::frame::{Frame, FrameError, MAX_FRAME_SIZE};
use crate::types::{DetectionMode, SpeedScope};

/// Widest parameter payload any request carries
const MAX_REQUEST_PAYLOAD: usize = 4;

/// Reduce a threshold to the 32-bit wire field, modulo 2^32
pub fn wrap_threshold(threshold: u64) -> u32 {
    (threshold % (1u64 << 32)) as u32
}

/// A command the host can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    GetTarget,
    SetSpeedScope { max: u16, min: u16 },
    GetSpeedScope,
    SetMode(DetectionMode),
    GetMode,
    SetThreshold(u32),
    GetThreshold,
}

impl Request {
    /// Speed window request, rejecting `max < min`
    pub fn set_speed_scope(max: u16, min: u16) -> Result<Self, FrameError> {
        let scope = SpeedScope::new(max, min)?;
        Ok(Self::SetSpeedScope {
            max: scope.max,
            min: scope.min,
        })
    }

    /// Threshold request from a value of any width
    ///
    /// The field is 32 bits wide; larger values wrap modulo 2^32.
    pub fn set_threshold_wrapping(threshold: u64) -> Self {
        Self::SetThreshold(wrap_threshold(threshold))
    }

    /// Command code this request is sent with
    pub fn command(&self) -> Command {
        match self {
            Self::GetTarget => Command::GetTarget,
            Self::SetSpeedScope { .. } => Command::SetSpeedScope,
            Self::GetSpeedScope => Command::GetSpeedScope,
            Self::SetMode(_) => Command::SetMode,
            Self::GetMode => Command::GetMode,
            Self::SetThreshold(_) => Command::SetThreshold,
            Self::GetThreshold => Command::GetThreshold,
        }
    }

    /// Build the frame for this request
    ///
    /// The payload width comes from the command table.
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let command = self.command();
        let width = match command.descriptor().request {
            RequestTemplate::Query => 0,
            RequestTemplate::Payload(width) => width,
            RequestTemplate::None => return Err(FrameError::InvalidArgument),
        };

        let mut payload = [0u8; MAX_REQUEST_PAYLOAD];
        match *self {
            Self::SetSpeedScope { max, min } => {
                if max < min {
                    return Err(FrameError::InvalidArgument);
                }
                payload[..2].copy_from_slice(&max.to_be_bytes());
                payload[2..4].copy_from_slice(&min.to_be_bytes());
            }
            Self::SetMode(mode) => payload[0] = mode.code(),
            Self::SetThreshold(threshold) => payload.copy_from_slice(&threshold.to_be_bytes()),
            Self::GetTarget | Self::GetSpeedScope | Self::GetMode | Self::GetThreshold => {}
        }

        let payload = payload.get(..width).ok_or(FrameError::PayloadTooLarge)?;
        Frame::new(command.code(), payload)
    }

    /// Build and encode the frame for this request
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        self.to_frame()?.encode_to_vec()
    }
}
