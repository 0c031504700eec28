//! Frequency tap on the master bus.
//!
//! Behaves like a Web Audio `AnalyserNode`: the most recent `fft_size`
//! samples are windowed (Blackman), transformed, smoothed over time and
//! mapped from a decibel range onto bytes.

use std::{f32::consts::PI, sync::Arc};

use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub const DEFAULT_SMOOTHING: f32 = 0.8;
pub const DEFAULT_MIN_DB: f32 = -100.0;
pub const DEFAULT_MAX_DB: f32 = -30.0;

pub struct Analyser {
    /// Ring of the most recent samples, oldest at `write_pos`.
    history: Vec<f32>,
    write_pos: usize,
    /// Blackman window coefficients
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, one per bin
    smoothed: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl Analyser {
    /// `fft_size` must be a power of two.
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let n = fft_size as f32;
        let window = (0..fft_size)
            .map(|i| {
                let x = i as f32 / n;
                0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
            })
            .collect();

        Self {
            history: vec![0.0; fft_size],
            write_pos: 0,
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            smoothing: DEFAULT_SMOOTHING,
            min_db: DEFAULT_MIN_DB,
            max_db: DEFAULT_MAX_DB,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    /// Number of bins returned by `byte_frequency_data`.
    pub fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 1.0);
    }

    /// Feed rendered master-bus samples.
    pub fn push(&mut self, samples: &[f32]) {
        let len = self.history.len();
        if samples.len() >= len {
            self.history.copy_from_slice(&samples[samples.len() - len..]);
            self.write_pos = 0;
            return;
        }
        for &s in samples {
            self.history[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % len;
        }
    }

    /// Zero the sample history and the smoothing state.
    pub fn clear(&mut self) {
        self.history.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }

    /// Analyse the current history and write one byte per bin into `out`.
    ///
    /// Each call advances the smoothing state, so call it once per frame.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        let len = self.history.len();
        for i in 0..len {
            let sample = self.history[(self.write_pos + i) % len];
            self.scratch[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let scale = 1.0 / len as f32;
        let range = self.max_db - self.min_db;
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;

            if let Some(byte) = out.get_mut(k) {
                let db = 20.0 * smoothed.max(1e-12).log10();
                let level = 255.0 / range * (db - self.min_db);
                *byte = level.clamp(0.0, 255.0) as u8;
            }
        }
    }
}
