use std::collections::VecDeque;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;

/// Interleaved samples kept for analysis.
pub const TAP_CAPACITY: usize = 8192;

/// Shared window onto the most recent samples a device produced.
///
/// A device creates exactly one tap and hands out clones; every clone reads
/// the same buffer.
#[derive(Debug, Clone)]
pub struct AnalysisTap {
    samples: Arc<Mutex<VecDeque<f32>>>,
    channels: Arc<AtomicU16>,
}

impl Default for AnalysisTap {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisTap {
    pub fn new() -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(TAP_CAPACITY))),
            channels: Arc::new(AtomicU16::new(1)),
        }
    }

    /// Whether `other` reads the same buffer.
    #[cfg(test)]
    pub fn same_as(&self, other: &AnalysisTap) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }

    pub fn channels(&self) -> u16 {
        self.channels.load(Ordering::Relaxed).max(1)
    }

    pub(crate) fn set_channels(&self, channels: u16) {
        self.channels.store(channels.max(1), Ordering::Relaxed);
    }

    /// Append one sample. Skipped rather than blocking when a reader holds
    /// the lock, since this runs on the output thread.
    pub(crate) fn push(&self, sample: f32) {
        if let Ok(mut buf) = self.samples.try_lock() {
            if buf.len() >= TAP_CAPACITY {
                buf.pop_front();
            }
            buf.push_back(sample);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut buf) = self.samples.lock() {
            buf.clear();
        }
    }

    /// The last `frames` frames downmixed to mono, oldest first. Zero-padded
    /// at the front when fewer frames are buffered.
    pub fn snapshot_mono(&self, frames: usize) -> Vec<f32> {
        let channels = usize::from(self.channels());
        let mut out = vec![0.0; frames];

        let Ok(buf) = self.samples.lock() else {
            return out;
        };

        let available = (buf.len() / channels).min(frames);
        let start = buf.len() - available * channels;
        let pad = frames - available;

        for f in 0..available {
            let base = start + f * channels;
            let sum: f32 = (0..channels).map(|c| buf[base + c]).sum();
            out[pad + f] = sum / channels as f32;
        }
        out
    }
}

/// Source wrapper feeding every sample it yields into an [`AnalysisTap`].
pub struct TapSource<S> {
    inner: S,
    tap: AnalysisTap,
}

impl<S> TapSource<S>
where
    S: Source<Item = f32>,
{
    pub fn new(inner: S, tap: AnalysisTap) -> Self {
        tap.set_channels(inner.channels());
        Self { inner, tap }
    }
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        self.tap.push(sample);
        Some(sample)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.inner.try_seek(pos)
    }
}
