/// Sample-accurate audio clock.
///
/// Time only moves while rendering and only while running; a suspended
/// clock freezes every scheduled envelope and modulation callback.
#[derive(Debug, Clone)]
pub struct AudioClock {
    sample_rate: f32,
    frames: u64,
    suspended: bool,
}

impl AudioClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: 0,
            suspended: false,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Seconds since the clock started.
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn advance(&mut self, frames: usize) {
        if !self.suspended {
            self.frames += frames as u64;
        }
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_in_seconds() {
        let mut clock = AudioClock::new(48_000.0);
        clock.advance(24_000);
        assert!((clock.now() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn suspended_clock_does_not_move() {
        let mut clock = AudioClock::new(1_000.0);
        clock.advance(100);
        clock.suspend();
        clock.advance(500);
        assert_eq!(clock.frames(), 100);

        clock.resume();
        clock.advance(1);
        assert_eq!(clock.frames(), 101);
    }
}
