use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex, num_complex::Complex32};

const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// Windowed FFT with temporal smoothing, producing byte magnitudes per bin
/// on a fixed decibel scale.
pub struct SpectrumAnalyser {
    fft_size: usize,
    smoothing: f32,
    plan: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    scratch: Vec<Complex32>,
    smoothed: Vec<f32>,
}

impl SpectrumAnalyser {
    /// `fft_size` must be a power of two; `smoothing` is in `[0, 1)`.
    pub fn new(fft_size: usize, smoothing: f32) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(fft_size);

        Self {
            fft_size,
            smoothing: smoothing.clamp(0.0, 0.999),
            window: blackman(fft_size),
            input: plan.make_input_vec(),
            spectrum: plan.make_output_vec(),
            scratch: plan.make_scratch_vec(),
            smoothed: vec![0.0; fft_size / 2],
            plan,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Analyse the newest `fft_size` samples. Shorter input is zero-padded
    /// at the front.
    pub fn analyse(&mut self, samples: &[f32]) -> Vec<u8> {
        let n = self.fft_size;
        let take = samples.len().min(n);
        let pad = n - take;
        let recent = &samples[samples.len() - take..];

        for (i, slot) in self.input.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = s * self.window[i];
        }

        if self
            .plan
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)
            .is_err()
        {
            return vec![0; self.bin_count()];
        }

        let k = self.smoothing;
        self.smoothed
            .iter_mut()
            .zip(&self.spectrum)
            .map(|(prev, c)| {
                let magnitude = c.norm() / n as f32;
                *prev = k * *prev + (1.0 - k) * magnitude;
                to_byte(*prev)
            })
            .collect()
    }

    #[cfg(test)]
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|v| *v = 0.0);
    }
}

impl fmt::Debug for SpectrumAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyser")
            .field("fft_size", &self.fft_size)
            .field("smoothing", &self.smoothing)
            .finish()
    }
}

fn blackman(len: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42, 0.5, 0.08);
    (0..len)
        .map(|i| {
            let x = i as f32 / len as f32;
            a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
        })
        .collect()
}

fn to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = 255.0 * (db - MIN_DB) / (MAX_DB - MIN_DB);
    scaled.clamp(0.0, 255.0) as u8
}

/// Pick `bars` bins at a fixed stride of `floor(bins / bars)`, scaled to
/// `[0, 1]`.
pub fn downsample_bars(bins: &[u8], bars: usize) -> Vec<f32> {
    if bars == 0 {
        return Vec::new();
    }
    let stride = (bins.len() / bars).max(1);
    (0..bars)
        .map(|i| {
            bins.get(i * stride)
                .map_or(0.0, |&v| f32::from(v) / 255.0)
        })
        .collect()
}
