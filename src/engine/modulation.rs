use rand::Rng;

use crate::{dsp::envelope::Envelope, error::EnvelopeError};

/*
Organic Gain Modulation
=======================

A static loop of noise or a steady saw wave is recognisably synthetic within
seconds. Each ambient layer therefore gets a "personality": a recipe that
keeps drawing a fresh, randomised gain envelope and then asks to be called
again when that envelope has played out.

  Drift   wind gusts, chatter bursts
          random duration D and peak I; linear rise to I over D/2, linear
          fall to a quiet floor by D.

            I ┤    ╱╲
              │   ╱  ╲
        floor ┤__╱    ╲__
              └──┬────┬──→
                now  now+D

  Swell   ocean waves
          period T = 1 / wave frequency; snap to 0, linear rise to 0.3 over
          T/4, exponential decay to 0.001 by T.

  Chirp   birdsong
          wait 2-7 s, jump 0 → 0.1 in 10 ms, decay exponentially to 0.001
          over the remaining 0.1-0.6 s.

Exponential segments always end on a small positive floor; an exponential
approach to exactly zero is undefined.

Recurrence
----------
`cycle` returns how long until the next cycle. The mixer re-queues a
`ModulationTask` for that time, and when the task comes due it first checks
that the owning sound is still playing the same activation (`generation`).
A stopped sound therefore never gets another cycle, and a quickly
restarted sound never inherits callbacks from its previous life.
*/

/// Random-walk style gust: duration and peak drawn per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    pub min_secs: f64,
    pub max_secs: f64,
    pub min_level: f32,
    pub max_level: f32,
    pub floor: f32,
}

pub const WIND: Drift = Drift {
    min_secs: 2.0,
    max_secs: 5.0,
    min_level: 0.05,
    max_level: 0.20,
    floor: 0.02,
};

pub const CHATTER: Drift = Drift {
    min_secs: 0.5,
    max_secs: 2.5,
    min_level: 0.02,
    max_level: 0.10,
    floor: 0.01,
};

pub const SWELL_PEAK: f32 = 0.3;
pub const CHIRP_PEAK: f32 = 0.1;
const CHIRP_ATTACK_SECS: f64 = 0.01;
const CHIRP_DELAY_SECS: (f64, f64) = (2.0, 7.0);
const CHIRP_LENGTH_SECS: (f64, f64) = (0.1, 0.6);

/// Exponential decays stop here, never at zero.
pub const SILENCE_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modulation {
    Drift(Drift),
    Swell { period: f64 },
    Chirp,
}

impl Modulation {
    pub fn wind() -> Self {
        Modulation::Drift(WIND)
    }

    pub fn chatter() -> Self {
        Modulation::Drift(CHATTER)
    }

    /// Waves at `frequency` swells per second.
    pub fn waves(frequency: f32) -> Self {
        Modulation::Swell {
            period: 1.0 / frequency as f64,
        }
    }

    /// Lay down one cycle of automation starting at `now`.
    ///
    /// Returns the delay in seconds before the next cycle should run.
    pub fn cycle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: f64,
        gain: &mut Envelope,
    ) -> Result<f64, EnvelopeError> {
        match *self {
            Modulation::Drift(drift) => {
                let duration = rng.gen_range(drift.min_secs..drift.max_secs);
                let level = rng.gen_range(drift.min_level..drift.max_level);

                gain.hold_at(now)?;
                gain.linear_ramp_to(level, now + duration / 2.0)?;
                gain.linear_ramp_to(drift.floor, now + duration)?;
                Ok(duration)
            }
            Modulation::Swell { period } => {
                gain.set_value_at(0.0, now)?;
                gain.linear_ramp_to(SWELL_PEAK, now + period / 4.0)?;
                gain.exponential_ramp_to(SILENCE_FLOOR, now + period)?;
                Ok(period)
            }
            Modulation::Chirp => {
                let delay = rng.gen_range(CHIRP_DELAY_SECS.0..CHIRP_DELAY_SECS.1);
                let length = rng.gen_range(CHIRP_LENGTH_SECS.0..CHIRP_LENGTH_SECS.1);
                let start = now + delay;

                gain.set_value_at(0.0, start)?;
                gain.linear_ramp_to(CHIRP_PEAK, start + CHIRP_ATTACK_SECS)?;
                gain.exponential_ramp_to(SILENCE_FLOOR, start + length)?;
                Ok(delay + length)
            }
        }
    }
}

/// A pending modulation cycle for one layer of one sound activation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulationTask {
    pub sound: String,
    /// Activation this task belongs to; stale generations are dropped.
    pub generation: u64,
    pub layer: usize,
    pub modulation: Modulation,
}
