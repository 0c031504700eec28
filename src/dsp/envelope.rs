use crate::{error::EnvelopeError, MIN_TIME};

/*
Scheduled Gain Envelopes
========================

An envelope here is a timeline of automation events on one parameter
(almost always a gain). Events are placed at absolute times on the audio
clock, so a modulation callback can lay down a whole swell in one go and
let rendering play it out sample by sample.

Vocabulary
----------

  event       A (time, value, shape) point on the timeline.

  set         The value jumps to `value` at `time` and holds.

  linear      The value travels in a straight line from the previous
              event's (time, value) and arrives at `value` at `time`.

  exponential Like linear, but the ratio changes at a constant rate:
                  v(t) = v0 * (v1 / v0) ^ ((t - t0) / (t1 - t0))
              This sounds like a natural decay. The curve is undefined for
              a target of zero, so targets must be positive; fade to a
              small floor such as 0.001 instead.

The Shape of One Swell
----------------------

  Level
   0.3 ┤      ╱╲
       │     ╱  ╲
       │    ╱    ╲_
       │   ╱       ╲___
 0.001 ┤__╱            ╲________
       └──┬──────┬──────────────┬──→ Time
         set   linear      exponential
         t0   t0+T/4          t0+T

Evaluation
----------

For time t we look at the last event at or before t and the first event
after it:

  - no events          → the resting value
  - next is a ramp     → interpolate from the last event towards the ramp
  - otherwise          → hold the last event's value

An exponential ramp that starts from zero, a negative value, or a different
sign than its target holds its starting value until the ramp's end time.

Pruning
-------

Modulation keeps appending events for as long as a sound plays. Rendering
drops every event older than the last one at or before the block start;
that last event stays as the anchor the next ramp interpolates from.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Event {
    shape: Shape,
    time: f64,
    value: f32,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    resting: f32,
    events: Vec<Event>,
}

impl Envelope {
    pub fn new(value: f32) -> Self {
        Self {
            resting: value,
            events: Vec::new(),
        }
    }

    /// Drop all automation and hold `value` from now on.
    pub fn set_value(&mut self, value: f32) {
        self.events.clear();
        self.resting = value;
    }

    pub fn set_value_at(&mut self, value: f32, time: f64) -> Result<(), EnvelopeError> {
        self.insert(Shape::Set, value, time)
    }

    /// Pin whatever the envelope would read at `time` as a set event.
    /// Ramps scheduled afterwards start from there.
    pub fn hold_at(&mut self, time: f64) -> Result<(), EnvelopeError> {
        let value = self.value_at(time);
        self.insert(Shape::Set, value, time)
    }

    pub fn linear_ramp_to(&mut self, value: f32, end_time: f64) -> Result<(), EnvelopeError> {
        self.insert(Shape::Linear, value, end_time)
    }

    pub fn exponential_ramp_to(&mut self, value: f32, end_time: f64) -> Result<(), EnvelopeError> {
        if !(value > 0.0) {
            return Err(EnvelopeError::NonPositiveTarget(value));
        }
        self.insert(Shape::Exponential, value, end_time)
    }

    /// Glide linearly from the current value at `now` to `target` over
    /// `seconds`, replacing anything scheduled after `now`.
    pub fn ramp_from(&mut self, now: f64, target: f32, seconds: f64) -> Result<(), EnvelopeError> {
        let start = self.value_at(now);
        self.cancel_from(now);
        self.insert(Shape::Set, start, now)?;
        self.insert(Shape::Linear, target, now + seconds.max(MIN_TIME))
    }

    /// Remove every event at or after `time`.
    pub fn cancel_from(&mut self, time: f64) {
        self.events.retain(|e| e.time < time);
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let next = self.events.partition_point(|e| e.time <= time);
        let (t0, v0) = match next.checked_sub(1).map(|i| self.events[i]) {
            Some(prev) => (prev.time, prev.value),
            None => (f64::NEG_INFINITY, self.resting),
        };

        let Some(upcoming) = self.events.get(next) else {
            return v0;
        };

        match upcoming.shape {
            Shape::Set => v0,
            Shape::Linear => {
                if !t0.is_finite() {
                    return v0;
                }
                let progress = ((time - t0) / (upcoming.time - t0)) as f32;
                v0 + (upcoming.value - v0) * progress
            }
            Shape::Exponential => {
                if !t0.is_finite() || v0 <= 0.0 {
                    return v0;
                }
                let progress = ((time - t0) / (upcoming.time - t0)) as f32;
                v0 * (upcoming.value / v0).powf(progress)
            }
        }
    }

    /// Render envelope values for consecutive samples starting at `start`.
    pub fn render(&mut self, out: &mut [f32], start: f64, sample_rate: f32) {
        self.prune(start);

        if self.events.is_empty() {
            out.fill(self.resting);
            return;
        }

        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start + i as f64 * dt);
        }
    }

    /// Forget events that can no longer influence anything at or after `time`.
    pub fn prune(&mut self, time: f64) {
        let next = self.events.partition_point(|e| e.time <= time);
        if next == 0 {
            return;
        }

        let anchor = next - 1;
        if anchor > 0 {
            self.events.drain(..anchor);
        }

        // The anchor has fully arrived, so it now behaves as a set event.
        self.events[0].shape = Shape::Set;

        if self.events.len() == 1 {
            self.resting = self.events[0].value;
            self.events.clear();
        }
    }

    /// Number of automation events still pending or anchoring a ramp.
    pub fn scheduled_events(&self) -> usize {
        self.events.len()
    }

    fn insert(&mut self, shape: Shape, value: f32, time: f64) -> Result<(), EnvelopeError> {
        if !time.is_finite() {
            return Err(EnvelopeError::InvalidTime(time));
        }
        let at = self.events.partition_point(|e| e.time <= time);
        self.events.insert(at, Event { shape, time, value });
        Ok(())
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(1.0)
    }
}
