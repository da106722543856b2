//! Simulation clock

/// Monotonic simulation time, advanced by the owner once per update.
///
/// Targets are stamped with [`SimClock::now`] when set, so the clock only
/// ever moves forward: negative or non-finite deltas are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    time: f32,
    delta: f32,
    frame: u64,
}

impl SimClock {
    /// Create a clock at time zero
    pub const fn new() -> Self {
        Self {
            time: 0.0,
            delta: 0.0,
            frame: 0,
        }
    }

    /// Advance by `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        if !delta_time.is_finite() || delta_time < 0.0 {
            self.delta = 0.0;
            return;
        }
        self.delta = delta_time;
        self.time += delta_time;
        self.frame += 1;
    }

    /// Current time in seconds
    #[inline]
    pub fn now(&self) -> f32 {
        self.time
    }

    /// Length of the last step in seconds
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of completed steps
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances() {
        let mut clock = SimClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.now(), 0.75);
        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_clock_ignores_negative_delta() {
        let mut clock = SimClock::new();
        clock.advance(1.0);
        clock.advance(-3.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 1);
    }
}
