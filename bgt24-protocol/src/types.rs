//! Decoded values reported by the radar

use heapless::Vec;

use crate::frame::{FrameError, MAX_PAYLOAD_SIZE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of I/Q sample pairs in one report
pub const MAX_IQ_SAMPLES: usize = MAX_PAYLOAD_SIZE / 2;

/// Movement of the detected target relative to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum TargetState {
    /// Nothing moving in range
    #[default]
    NoTarget = 0,
    /// Target moving away
    Leaving = 1,
    /// Target moving closer
    Approaching = 2,
}

impl TargetState {
    /// Map a device code, rejecting anything undocumented
    pub fn from_code(code: u8) -> Result<Self, FrameError> {
        match code {
            0 => Ok(Self::NoTarget),
            1 => Ok(Self::Leaving),
            2 => Ok(Self::Approaching),
            other => Err(FrameError::UnknownCode(other)),
        }
    }

    /// Whether anything is moving
    pub fn is_detected(self) -> bool {
        self != Self::NoTarget
    }
}

/// Operating mode of the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DetectionMode {
    /// Module reports target speed and state on request
    #[default]
    TargetDetect = 0,
    /// Module streams raw I/Q ADC samples
    IqReport = 1,
}

impl DetectionMode {
    /// Map a device code, rejecting anything undocumented
    pub fn from_code(code: u8) -> Result<Self, FrameError> {
        match code {
            0 => Ok(Self::TargetDetect),
            1 => Ok(Self::IqReport),
            other => Err(FrameError::UnknownCode(other)),
        }
    }

    /// Wire code
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Result of a get-target query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetReading {
    /// Direction of movement
    pub state: TargetState,
    /// Radial speed in the module's native unit (cm/s)
    pub speed: u16,
}

/// Speed window outside which the module ignores targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedScope {
    /// Upper bound
    pub max: u16,
    /// Lower bound
    pub min: u16,
}

impl SpeedScope {
    /// Create a scope, rejecting `max < min`
    pub fn new(max: u16, min: u16) -> Result<Self, FrameError> {
        if max < min {
            return Err(FrameError::InvalidArgument);
        }
        Ok(Self { max, min })
    }

    /// Whether `speed` lies within the window
    pub fn contains(&self, speed: u16) -> bool {
        (self.min..=self.max).contains(&speed)
    }
}

/// One I/Q ADC report
///
/// `i[n]` and `q[n]` were sampled together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IqSamples {
    /// In-phase samples
    pub i: Vec<u8, MAX_IQ_SAMPLES>,
    /// Quadrature samples
    pub q: Vec<u8, MAX_IQ_SAMPLES>,
}

impl IqSamples {
    /// Number of sample pairs
    pub fn len(&self) -> usize {
        self.i.len()
    }

    /// Whether the report carried no samples
    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }

    /// Iterate over (I, Q) pairs
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.i.iter().copied().zip(self.q.iter().copied())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IqSamples {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "IqSamples[{} pairs]", self.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_state_codes() {
        assert_eq!(TargetState::from_code(0), Ok(TargetState::NoTarget));
        assert_eq!(TargetState::from_code(1), Ok(TargetState::Leaving));
        assert_eq!(TargetState::from_code(2), Ok(TargetState::Approaching));
        assert_eq!(TargetState::from_code(3), Err(FrameError::UnknownCode(3)));
        assert!(!TargetState::NoTarget.is_detected());
        assert!(TargetState::Leaving.is_detected());
    }

    #[test]
    fn test_detection_mode_codes() {
        assert_eq!(DetectionMode::from_code(0), Ok(DetectionMode::TargetDetect));
        assert_eq!(DetectionMode::from_code(1), Ok(DetectionMode::IqReport));
        assert_eq!(DetectionMode::from_code(7), Err(FrameError::UnknownCode(7)));
        assert_eq!(DetectionMode::IqReport.code(), 1);
    }

    #[test]
    fn test_speed_scope_rejects_inverted() {
        assert_eq!(SpeedScope::new(50, 100), Err(FrameError::InvalidArgument));

        let scope = SpeedScope::new(100, 50).unwrap();
        assert!(scope.contains(50));
        assert!(scope.contains(100));
        assert!(!scope.contains(101));

        // Degenerate single-value window is allowed
        assert!(SpeedScope::new(30, 30).is_ok());
    }
}
