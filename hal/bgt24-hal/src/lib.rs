//! BGT24LTR11 Hardware Abstraction Layer
//!
//! This crate defines the capabilities the radar driver consumes from its
//! environment: a byte-oriented serial port and a microsecond clock. Board
//! support code implements these traits (or uses the adapters provided here)
//! so the same driver runs on any MCU or on a host machine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (polling loop, CLI, ...)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bgt24-driver                           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bgt24-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-io   │       │ embedded-hal  │
//! │ UARTs         │       │ delays, time  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialPort`] - Byte-stream serial transport
//! - [`clock::Clock`] - Monotonic microsecond clock for timeout polling

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod io;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::{Clock, DelayClock};
pub use io::IoSerial;
pub use uart::{SerialPort, UartConfig};

#[cfg(feature = "embassy")]
pub use clock::EmbassyClock;
#[cfg(feature = "std")]
pub use clock::StdClock;
