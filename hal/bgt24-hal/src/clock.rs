//! Microsecond clock abstraction
//!
//! Timeouts are measured as the wrapping difference of two `now_us`
//! readings, so a 32-bit counter that rolls over every ~71 minutes is fine.

/// Monotonic microsecond clock
pub trait Clock {
    /// Current time in microseconds (wrapping)
    fn now_us(&mut self) -> u32;

    /// Called while polling for data that has not arrived yet
    ///
    /// The default spins. Implementations may sleep, yield, or (for
    /// delay-driven clocks) advance time here.
    fn pause(&mut self) {}

    /// Microseconds elapsed since `start`
    fn elapsed_since(&mut self, start: u32) -> u32 {
        self.now_us().wrapping_sub(start)
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_us(&mut self) -> u32 {
        T::now_us(self)
    }

    fn pause(&mut self) {
        T::pause(self)
    }
}

/// Default poll interval for [`DelayClock`]
pub const DEFAULT_POLL_INTERVAL_US: u32 = 50;

/// Clock synthesised from a blocking delay
///
/// For boards without a free-running timer. Time only advances when the
/// driver pauses, by exactly the poll interval, so the measured time is a
/// lower bound of the real time spent.
pub struct DelayClock<D> {
    delay: D,
    elapsed_us: u32,
    poll_interval_us: u32,
}

impl<D: embedded_hal::delay::DelayNs> DelayClock<D> {
    /// Create a clock that pauses for [`DEFAULT_POLL_INTERVAL_US`] per poll
    pub fn new(delay: D) -> Self {
        Self::with_poll_interval(delay, DEFAULT_POLL_INTERVAL_US)
    }

    /// Create a clock with a custom poll interval (minimum 1us)
    pub fn with_poll_interval(delay: D, poll_interval_us: u32) -> Self {
        Self {
            delay,
            elapsed_us: 0,
            poll_interval_us: poll_interval_us.max(1),
        }
    }

    /// Release the underlying delay
    pub fn free(self) -> D {
        self.delay
    }
}

impl<D: embedded_hal::delay::DelayNs> Clock for DelayClock<D> {
    fn now_us(&mut self) -> u32 {
        self.elapsed_us
    }

    fn pause(&mut self) {
        self.delay.delay_us(self.poll_interval_us);
        self.elapsed_us = self.elapsed_us.wrapping_add(self.poll_interval_us);
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_us(&mut self) -> u32 {
        embassy_time::Instant::now().as_micros() as u32
    }
}

/// Clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose zero is now
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&mut self) -> u32 {
        self.origin.elapsed().as_micros() as u32
    }

    fn pause(&mut self) {
        std::thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDelay {
        total_ns: u64,
    }

    impl embedded_hal::delay::DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_delay_clock_advances_on_pause() {
        let mut clock = DelayClock::with_poll_interval(MockDelay { total_ns: 0 }, 100);
        let start = clock.now_us();
        assert_eq!(start, 0);

        clock.pause();
        clock.pause();
        assert_eq!(clock.elapsed_since(start), 200);

        let delay = clock.free();
        assert_eq!(delay.total_ns, 200_000);
    }

    #[test]
    fn test_delay_clock_zero_interval_clamped() {
        let mut clock = DelayClock::with_poll_interval(MockDelay { total_ns: 0 }, 0);
        clock.pause();
        assert_eq!(clock.now_us(), 1);
    }

    #[test]
    fn test_elapsed_wraps() {
        let mut clock = DelayClock::with_poll_interval(MockDelay { total_ns: 0 }, 10);
        clock.elapsed_us = u32::MAX - 4;
        let start = clock.now_us();
        clock.pause();
        assert_eq!(clock.now_us(), 5);
        assert_eq!(clock.elapsed_since(start), 10);
    }
}
