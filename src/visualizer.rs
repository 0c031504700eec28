//! Spectrum bars read from the master-bus analyser.
//!
//! The visualizer keeps reading whether or not anything plays; silence
//! simply reads as empty bars.

use crate::mixer::Analyser;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Height in the caller's units, `0..=height`.
    pub height: u16,
    /// Level fraction 0..1 the height and colour derive from.
    pub level: f32,
    pub rgb: (u8, u8, u8),
}

/// Colour of a bar at level fraction `h`: green at rest, pale at the top.
pub fn bar_color(h: f32) -> (u8, u8, u8) {
    let h = h.clamp(0.0, 1.0);
    (
        (16.0 + 169.0 * h) as u8,
        (185.0 + 70.0 * h) as u8,
        (129.0 + 126.0 * h) as u8,
    )
}

#[derive(Debug, Clone, Default)]
pub struct VisualizerState {
    bins: Vec<u8>,
}

impl VisualizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull the latest frequency data from `analyser`.
    pub fn refresh(&mut self, analyser: &mut Analyser) {
        self.bins.resize(analyser.frequency_bin_count(), 0);
        analyser.byte_frequency_data(&mut self.bins);
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// One bar per frequency bin, scaled to `height`.
    pub fn bars(&self, height: u16) -> Vec<Bar> {
        self.bins.iter().map(|&b| make_bar(b as f32, height)).collect()
    }

    /// `count` bars, each averaging an equal share of the bins.
    pub fn grouped_bars(&self, count: usize, height: u16) -> Vec<Bar> {
        if count == 0 || self.bins.is_empty() {
            return Vec::new();
        }
        let count = count.min(self.bins.len());
        (0..count)
            .map(|i| {
                let start = i * self.bins.len() / count;
                let end = ((i + 1) * self.bins.len() / count).max(start + 1);
                let group = &self.bins[start..end];
                let mean = group.iter().map(|&b| b as f32).sum::<f32>() / group.len() as f32;
                make_bar(mean, height)
            })
            .collect()
    }
}

fn make_bar(value: f32, height: u16) -> Bar {
    let level = (value / 255.0).clamp(0.0, 1.0);
    Bar {
        height: (level * height as f32).round() as u16,
        level,
        rgb: bar_color(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_ramp_endpoints() {
        assert_eq!(bar_color(0.0), (16, 185, 129));
        assert_eq!(bar_color(1.0), (185, 255, 255));
    }

    #[test]
    fn silence_gives_flat_bars() {
        let mut analyser = Analyser::new(256);
        let mut vis = VisualizerState::new();
        vis.refresh(&mut analyser);

        let bars = vis.bars(20);
        assert_eq!(bars.len(), 128);
        assert!(bars.iter().all(|bar| bar.height == 0 && bar.rgb == (16, 185, 129)));
    }

    #[test]
    fn grouped_bars_average_bins() {
        let vis = VisualizerState {
            bins: vec![255, 255, 0, 0, 51, 51],
        };
        let bars = vis.grouped_bars(3, 10);
        let heights: Vec<u16> = bars.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![10, 0, 2]);
        assert!(vis.grouped_bars(0, 10).is_empty());
        assert_eq!(vis.grouped_bars(50, 10).len(), 6);
    }
}
