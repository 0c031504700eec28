//! Timekeeping and recurring work on the audio clock.
//!
//! Nothing here runs on its own thread. The mixer advances the clock while
//! rendering and drains whatever the scheduler says is due, so modulation
//! callbacks interleave with rendering on a single timeline.

pub mod clock;
pub mod modulation;
pub mod scheduler;

pub use clock::AudioClock;
pub use modulation::{Modulation, ModulationTask};
pub use scheduler::Scheduler;
