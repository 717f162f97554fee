use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    /// No tracks to play.
    #[default]
    Idle,
    /// A source was just assigned and the device is loading it.
    Loading,
    Playing,
    Paused,
    /// The current track ended and the next one is being queued.
    Advancing,
}

impl PlaybackPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Advancing => "advancing",
        }
    }
}

/// Snapshot of what the controller believes the device is doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackInfo {
    pub current_index: usize,
    pub phase: PlaybackPhase,
    pub is_playing: bool,
    pub is_muted: bool,
    /// Position over duration, in `[0, 1]`.
    pub progress: f64,
    /// User-facing diagnostic, e.g. a source that failed to load.
    pub notice: Option<String>,
}

/// `position / duration` clamped to `[0, 1]`; `0` while the duration is
/// unknown or zero.
pub fn progress_fraction(position: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(d) if !d.is_zero() => {
            if position >= d {
                1.0
            } else {
                (position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
        }
        _ => 0.0,
    }
}
