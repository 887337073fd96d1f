//! BGT24LTR11 radar driver
//!
//! Drives the Seeed BGT24LTR11 24 GHz Doppler radar module over a serial
//! port. Each operation is one synchronous exchange: send the request,
//! scan the input for the matching reply, verify it, decode it.
//!
//! - Target speed and direction (get-target)
//! - Speed window (set/get speed scope)
//! - Operating mode: target detection or raw I/Q streaming
//! - Detection threshold
//! - I/Q ADC reports pushed by the module in I/Q mode
//!
//! The driver is generic over a [`SerialPort`] and a [`Clock`]
//! from `bgt24-hal`. Every wait is bounded by the clock, so a silent or
//! misbehaving module turns into an [`Error`] rather than a hang.
//!
//! ```rust,ignore
//! use bgt24_driver::Bgt24ltr11;
//! use bgt24_hal::{DelayClock, IoSerial};
//!
//! let mut radar = Bgt24ltr11::new(IoSerial::new(uart), DelayClock::new(delay));
//! let reading = radar.get_target()?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod radar;

pub use bgt24_hal::{Clock, SerialPort, UartConfig};
pub use bgt24_protocol::{DetectionMode, IqSamples, SpeedScope, TargetReading, TargetState};
pub use config::{ConfigError, DriverConfig};
pub use error::Error;
pub use radar::Bgt24ltr11;
