//! Composable building blocks for ambient-sound signal paths.
//!
//! Graph nodes wrap the DSP primitives with a start/stop lifecycle and
//! block-based rendering. Sources (oscillators, looping buffers) feed
//! processors (filters, gains) through `Through` chains; the `extensions`
//! module adds the fluent `.through()` helper.

/// Looping sample-buffer playback.
pub mod buffer;
/// Fluent combinators (`.through()`).
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Envelope-driven gain stage.
pub mod gain;
/// Core trait shared by all graph nodes.
pub mod node;
/// Fixed-frequency audio oscillators.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
