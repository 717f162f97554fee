//! Transport state for the single shared output device.

mod controller;
mod types;

pub use controller::PlaybackController;
pub use types::{progress_fraction, PlaybackInfo, PlaybackPhase};

#[cfg(test)]
mod tests;
