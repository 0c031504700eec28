//! Low-level DSP primitives used by the graph nodes.
//!
//! These components do their math on caller-provided slices and never
//! allocate while rendering. Graph nodes layer lifecycle (start/stop) and
//! parameter automation on top.

/// Scheduled parameter automation (linear and exponential ramps).
pub mod envelope;
/// State-variable filter with low-pass, high-pass, band-pass and notch outputs.
pub mod filter;
/// White and brown noise buffers.
pub mod noise;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;

pub use envelope::Envelope;
pub use noise::NoiseColor;
