//! Spectrum bars fed from the output device's analysis tap.
//!
//! Purely presentational: nothing else reads what this computes.

mod analyser;

pub use analyser::{downsample_bars, SpectrumAnalyser};

use crate::audio::AnalysisTap;
use crate::config::VisualizerSettings;

#[derive(Debug)]
pub struct Visualizer {
    tap: AnalysisTap,
    analyser: SpectrumAnalyser,
    bars: usize,
}

impl Visualizer {
    /// Attach to the device's one tap. The visualizer never creates a tap of
    /// its own.
    pub fn attach(tap: AnalysisTap, settings: &VisualizerSettings) -> Self {
        Self {
            tap,
            analyser: SpectrumAnalyser::new(settings.fft_size, settings.smoothing),
            bars: settings.bars,
        }
    }

    #[cfg(test)]
    pub fn tap(&self) -> &AnalysisTap {
        &self.tap
    }

    /// Bar heights in `[0, 1]` for the current frame. While not `live` the
    /// tap holds stale samples, so silence is analysed and the bars decay.
    pub fn frame(&mut self, live: bool) -> Vec<f32> {
        let size = self.analyser.fft_size();
        let samples = if live {
            self.tap.snapshot_mono(size)
        } else {
            vec![0.0; size]
        };
        let bins = self.analyser.analyse(&samples);
        downsample_bars(&bins, self.bars)
    }
}
