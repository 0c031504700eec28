//! Study/break countdown driven by a fixed one-second tick.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Study,
    Break,
}

/// What a tick finished, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Study,
    Break,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    study_secs: u32,
    short_break_secs: u32,
    long_break_secs: u32,
    long_break_every: u32,
    phase: Phase,
    remaining: u32,
    total: u32,
    running: bool,
    paused: bool,
    completed_sessions: u32,
    session: u32,
}

impl Countdown {
    pub fn new(study_secs: u32, short_break_secs: u32, long_break_secs: u32) -> Self {
        let study_secs = study_secs.max(1);
        Self {
            study_secs,
            short_break_secs: short_break_secs.max(1),
            long_break_secs: long_break_secs.max(1),
            long_break_every: 4,
            phase: Phase::Study,
            remaining: study_secs,
            total: study_secs,
            running: false,
            paused: false,
            completed_sessions: 0,
            session: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Fraction of the current phase already elapsed.
    pub fn progress(&self) -> f64 {
        1.0 - self.remaining as f64 / self.total as f64
    }

    /// `mm:ss` of the time left.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    pub fn start(&mut self) {
        if !self.paused {
            self.remaining = self.total;
        }
        self.paused = false;
        self.running = true;
    }

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            self.paused = true;
        }
    }

    /// Start if idle or paused, pause if running. Returns whether it runs.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
        self.running
    }

    /// Back to an idle study phase, keeping the session count.
    pub fn reset(&mut self) {
        self.running = false;
        self.paused = false;
        self.phase = Phase::Study;
        self.total = self.study_secs;
        self.remaining = self.total;
    }

    /// Advance one second.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }

        self.running = false;
        self.paused = false;
        match self.phase {
            Phase::Study => {
                self.completed_sessions += 1;
                self.phase = Phase::Break;
                self.total = self.break_secs();
                self.remaining = self.total;
                Some(Completion::Study)
            }
            Phase::Break => {
                self.session += 1;
                self.phase = Phase::Study;
                self.total = self.study_secs;
                self.remaining = self.total;
                Some(Completion::Break)
            }
        }
    }

    fn break_secs(&self) -> u32 {
        if self.completed_sessions % self.long_break_every == 0 {
            self.long_break_secs
        } else {
            self.short_break_secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_does_not_tick() {
        let mut timer = Countdown::new(3, 2, 5);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), 3);
        assert_eq!(timer.display(), "00:03");
    }

    #[test]
    fn study_then_break_then_study() {
        let mut timer = Countdown::new(3, 2, 5);
        timer.start();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), Some(Completion::Study));
        assert_eq!(timer.phase(), Phase::Break);
        assert!(!timer.is_running(), "breaks wait for a start");
        assert_eq!(timer.remaining(), 2);

        timer.start();
        timer.tick();
        assert_eq!(timer.tick(), Some(Completion::Break));
        assert_eq!(timer.phase(), Phase::Study);
        assert_eq!(timer.session(), 2);
    }

    #[test]
    fn every_fourth_break_is_long() {
        let mut timer = Countdown::new(1, 2, 5);
        for session in 1..=4 {
            timer.start();
            assert_eq!(timer.tick(), Some(Completion::Study));
            let expected = if session == 4 { 5 } else { 2 };
            assert_eq!(timer.remaining(), expected, "break after session {session}");
            timer.start();
            while timer.tick().is_none() {}
        }
        assert_eq!(timer.completed_sessions(), 4);
    }

    #[test]
    fn pause_keeps_remaining_time() {
        let mut timer = Countdown::new(10, 2, 5);
        assert!(timer.toggle());
        timer.tick();
        timer.tick();
        assert!(!timer.toggle());
        assert!(timer.is_paused());
        assert_eq!(timer.tick(), None);

        assert!(timer.toggle());
        assert_eq!(timer.remaining(), 8);
        assert!((timer.progress() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn reset_returns_to_study() {
        let mut timer = Countdown::new(1, 2, 5);
        timer.start();
        timer.tick();
        assert_eq!(timer.phase(), Phase::Break);

        timer.reset();
        assert_eq!(timer.phase(), Phase::Study);
        assert_eq!(timer.remaining(), 1);
        assert!(!timer.is_running());
    }
}
