//! Driver configuration

use bgt24_hal::UartConfig;
use bgt24_protocol::MAX_FRAME_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default wait for the first reply byte, and between reply bytes
pub const DEFAULT_TIMEOUT_US: u32 = 5000;

/// Default number of bytes scanned before giving up on a reply
pub const DEFAULT_MAX_SCAN_BYTES: usize = 4 * MAX_FRAME_SIZE;

/// Silence, in characters, tolerated between reply bytes
pub const BYTE_TIMEOUT_CHARS: u32 = 32;

/// Timing and scanning behaviour of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DriverConfig {
    /// How long to wait for the first byte of a reply (microseconds)
    pub response_timeout_us: u32,
    /// Longest silence tolerated once bytes are flowing (microseconds)
    pub byte_timeout_us: u32,
    /// Discard pending input before sending a request
    pub clear_input_before_request: bool,
    /// Upper bound on bytes examined while looking for a reply
    ///
    /// Also bounds how much stale input is discarded before a request.
    pub max_scan_bytes: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            response_timeout_us: DEFAULT_TIMEOUT_US,
            byte_timeout_us: DEFAULT_TIMEOUT_US,
            clear_input_before_request: true,
            max_scan_bytes: DEFAULT_MAX_SCAN_BYTES,
        }
    }
}

/// Configuration problems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timeout of zero would fail every exchange
    ZeroTimeout,
    /// Scan limit cannot hold a single frame
    ScanLimitTooSmall,
    /// Text could not be parsed
    Parse,
}

impl DriverConfig {
    /// Defaults scaled to the line speed
    ///
    /// The inter-byte timeout is [`BYTE_TIMEOUT_CHARS`] character times, and
    /// neither timeout drops below [`DEFAULT_TIMEOUT_US`].
    pub fn for_uart(uart: &UartConfig) -> Self {
        let byte_timeout_us = uart
            .char_time_us()
            .saturating_mul(BYTE_TIMEOUT_CHARS)
            .max(DEFAULT_TIMEOUT_US);
        Self {
            response_timeout_us: byte_timeout_us,
            byte_timeout_us,
            ..Self::default()
        }
    }

    /// Check the configuration for values that make the driver unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.response_timeout_us == 0 || self.byte_timeout_us == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_scan_bytes < MAX_FRAME_SIZE {
            return Err(ConfigError::ScanLimitTooSmall);
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML
    ///
    /// Missing keys take their default values:
    ///
    /// ```toml
    /// response_timeout_us = 10000
    /// byte_timeout_us = 2000
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}
