//! BGT24LTR11 driver
//!
//! # Exchange
//!
//! Each operation runs the same cycle, parameterised by the command table
//! in `bgt24-protocol`:
//!
//! 1. Discard stale input (configurable)
//! 2. Write the request frame and flush
//! 3. Wait up to `response_timeout_us` for the first byte
//! 4. Feed bytes to a [`FrameScanner`] until it yields the reply; any gap
//!    longer than `byte_timeout_us` ends the scan
//! 5. Verify the checksum and decode
//!
//! There is no retry inside an operation. A failed call leaves nothing
//! behind, so the caller can simply call again.

use bgt24_hal::{Clock, SerialPort};
use bgt24_protocol::{request, response};
use bgt24_protocol::{
    Command, DetectionMode, Frame, FrameScanner, IqSamples, Request, SpeedScope, TargetReading,
    TargetState, MAX_FRAME_SIZE,
};

use crate::config::{ConfigError, DriverConfig};
use crate::error::Error;

/// BGT24LTR11 radar on a serial port
///
/// `S` and `C` may be owned values or `&mut` borrows of the caller's port
/// and clock.
pub struct Bgt24ltr11<S, C> {
    serial: S,
    clock: C,
    config: DriverConfig,
}

impl<S, C> Bgt24ltr11<S, C> {
    /// Create a driver with the default configuration
    pub fn new(serial: S, clock: C) -> Self {
        Self {
            serial,
            clock,
            config: DriverConfig::default(),
        }
    }

    /// Create a driver with a custom configuration
    pub fn with_config(serial: S, clock: C, config: DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            serial,
            clock,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Release the serial port and clock
    pub fn release(self) -> (S, C) {
        (self.serial, self.clock)
    }
}

impl<S, C> Bgt24ltr11<S, C>
where
    S: SerialPort,
    C: Clock,
{
    /// Read target speed and direction
    pub fn get_target(&mut self) -> Result<TargetReading, Error<S::Error>> {
        let frame = self.transact(&Request::GetTarget)?;
        Ok(response::decode_target(&frame)?)
    }

    /// Read target speed only
    pub fn get_speed(&mut self) -> Result<u16, Error<S::Error>> {
        self.get_target().map(|reading| reading.speed)
    }

    /// Read target direction only
    pub fn get_target_state(&mut self) -> Result<TargetState, Error<S::Error>> {
        self.get_target().map(|reading| reading.state)
    }

    /// Set the speed window
    ///
    /// Fails with [`Error::InvalidArgument`] without sending anything when
    /// `max < min`.
    pub fn set_speed_scope(&mut self, max: u16, min: u16) -> Result<(), Error<S::Error>> {
        let request = Request::set_speed_scope(max, min).inspect_err(|_| {
            warn!("speed scope rejected: max {} < min {}", max, min);
        })?;

        let frame = self.transact(&request)?;
        let echoed = response::decode_speed_scope(&frame)?;
        if echoed != (SpeedScope { max, min }) {
            debug!("speed scope echo {}..{} differs", echoed.min, echoed.max);
            return Err(Error::EchoMismatch);
        }
        Ok(())
    }

    /// Read the speed window
    pub fn get_speed_scope(&mut self) -> Result<SpeedScope, Error<S::Error>> {
        let frame = self.transact(&Request::GetSpeedScope)?;
        Ok(response::decode_speed_scope(&frame)?)
    }

    /// Switch between target detection and I/Q reporting
    pub fn set_mode(&mut self, mode: DetectionMode) -> Result<(), Error<S::Error>> {
        let frame = self.transact(&Request::SetMode(mode))?;
        if response::decode_mode(&frame)? != mode {
            return Err(Error::EchoMismatch);
        }
        Ok(())
    }

    /// Read the operating mode
    pub fn get_mode(&mut self) -> Result<DetectionMode, Error<S::Error>> {
        let frame = self.transact(&Request::GetMode)?;
        Ok(response::decode_mode(&frame)?)
    }

    /// Set the detection threshold
    ///
    /// The threshold field is 32 bits wide. Larger values are not rejected;
    /// they wrap modulo 2^32, and the echo is compared with the wrapped value.
    pub fn set_threshold(&mut self, threshold: u64) -> Result<(), Error<S::Error>> {
        let wire = request::wrap_threshold(threshold);
        if u64::from(wire) != threshold {
            debug!("threshold {} wrapped to {}", threshold, wire);
        }

        let frame = self.transact(&Request::SetThreshold(wire))?;
        if response::decode_threshold(&frame)? != wire {
            return Err(Error::EchoMismatch);
        }
        Ok(())
    }

    /// Read the detection threshold
    pub fn get_threshold(&mut self) -> Result<u32, Error<S::Error>> {
        let frame = self.transact(&Request::GetThreshold)?;
        Ok(response::decode_threshold(&frame)?)
    }

    /// Wait for the next I/Q ADC report
    ///
    /// The module pushes these on its own while in [`DetectionMode::IqReport`];
    /// nothing is sent and pending input is not discarded.
    pub fn read_iq_adc(&mut self) -> Result<IqSamples, Error<S::Error>> {
        let frame = self.receive(Command::IqAdc)?;
        Ok(response::decode_iq_adc(&frame)?)
    }

    /// Send a request and return its verified reply frame
    ///
    /// For callers that need fields the typed methods do not expose.
    pub fn transact(&mut self, request: &Request) -> Result<Frame, Error<S::Error>> {
        let bytes = request.encode_to_vec()?;

        if self.config.clear_input_before_request {
            self.clear_input()?;
        }

        self.serial.write(&bytes).map_err(Error::Transport)?;
        self.serial.flush().map_err(Error::Transport)?;
        trace!(
            "sent {} ({} bytes)",
            request.command().descriptor().name,
            bytes.len()
        );

        self.receive(request.command())
    }

    /// Scan the input for a reply to `command` and verify it
    pub fn receive(&mut self, command: Command) -> Result<Frame, Error<S::Error>> {
        let name = command.descriptor().name;
        let mut scanner = FrameScanner::new(command);

        self.wait_for_data().inspect_err(|_| {
            debug!("{}: no reply", name);
        })?;

        let mut last_byte = self.clock.now_us();
        let mut scanned = 0usize;
        loop {
            let Some(byte) = self.serial.read().map_err(Error::Transport)? else {
                if self.clock.elapsed_since(last_byte) >= self.config.byte_timeout_us {
                    if scanner.is_idle() {
                        debug!("{}: input exhausted after {} bytes", name, scanned);
                        return Err(Error::NoFrame);
                    }
                    warn!("{}: reply stalled", name);
                    return Err(Error::Timeout);
                }
                self.clock.pause();
                continue;
            };

            last_byte = self.clock.now_us();
            scanned += 1;

            let candidate = scanner.feed(byte).inspect_err(|e| {
                warn!("{}: bad frame {}", name, e);
            })?;

            if let Some(frame) = candidate {
                frame.verify().inspect_err(|e| {
                    warn!("{}: {}", name, e);
                })?;
                trace!("{}: reply after {} bytes", name, scanned);
                return Ok(frame);
            }

            // A candidate started before the limit may still complete, but
            // no candidate lasts longer than one frame
            let limit = if scanner.is_idle() {
                self.config.max_scan_bytes
            } else {
                self.config.max_scan_bytes.saturating_add(MAX_FRAME_SIZE)
            };
            if scanned >= limit {
                debug!("{}: gave up after {} bytes", name, scanned);
                return Err(Error::NoFrame);
            }
        }
    }

    /// Discard pending input
    ///
    /// Returns the number of bytes dropped. Stops after `max_scan_bytes`
    /// so a module streaming I/Q data cannot keep it busy forever.
    pub fn clear_input(&mut self) -> Result<usize, Error<S::Error>> {
        let mut drained = 0;
        while drained < self.config.max_scan_bytes
            && self.serial.available().map_err(Error::Transport)? > 0
        {
            match self.serial.read().map_err(Error::Transport)? {
                Some(_) => drained += 1,
                None => break,
            }
        }
        if drained > 0 {
            trace!("discarded {} stale bytes", drained);
        }
        Ok(drained)
    }

    fn wait_for_data(&mut self) -> Result<(), Error<S::Error>> {
        let start = self.clock.now_us();
        loop {
            if self.serial.available().map_err(Error::Transport)? > 0 {
                return Ok(());
            }
            if self.clock.elapsed_since(start) >= self.config.response_timeout_us {
                return Err(Error::Timeout);
            }
            self.clock.pause();
        }
    }
}
