//! BGT24LTR11 Radar Serial Protocol
//!
//! This crate implements the binary protocol spoken by the Seeed BGT24LTR11
//! 24 GHz Doppler radar module over its UART. It covers building request
//! frames, recognising response frames in a noisy byte stream, and decoding
//! their payloads. It performs no I/O itself; see `bgt24-driver` for that.
//!
//! # Frame Format
//!
//! Requests and responses share one layout:
//! ```text
//! ┌────────┬─────────┬─────────┬────────┬─────────────┬──────────┐
//! │ HEADER │ ADDRESS │ COMMAND │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 0x55   │ 0x2A    │ 1B      │ 2B BE  │ 0–512B      │ 2B BE    │
//! └────────┴─────────┴─────────┴────────┴─────────────┴──────────┘
//! ```
//!
//! LENGTH counts the payload plus the checksum. CHECKSUM is the 16-bit
//! wrapping sum of every byte before it.
//!
//! All fixed-size responses have their payload width implied by the
//! command; only the I/Q ADC report relies on LENGTH to size its body.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod request;
pub mod response;
pub mod scanner;
pub mod types;

pub use command::{Command, CommandDescriptor, RequestTemplate, ResponseShape, COMMAND_TABLE};
pub use frame::{checksum, Frame, FrameError, ADDRESS, HEADER, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use request::Request;
pub use response::Response;
pub use scanner::FrameScanner;
pub use types::{DetectionMode, IqSamples, SpeedScope, TargetReading, TargetState};
