//! Real-world scenario benchmarks.
//!
//! The mixer rendering the sound combinations people actually leave
//! running for hours, modulation scheduling included.

mod soundscape;

pub use soundscape::bench_soundscapes;
