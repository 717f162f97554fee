use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use url::Url;

use crate::audio::{AnalysisTap, DeviceEvent, MediaDevice, SourceResolver, SubscriptionId};
use crate::library::Track;

use super::types::{PlaybackInfo, PlaybackPhase, progress_fraction};

/// Sole owner of the output device.
///
/// Every transport request goes through here. State is only ever updated
/// from the device's own events, drained at the end of each call and on
/// [`tick`](Self::tick).
pub struct PlaybackController<D: MediaDevice> {
    device: D,
    events: Receiver<DeviceEvent>,
    subscription: Option<SubscriptionId>,
    resolver: SourceResolver,
    tracks: Vec<Track>,
    info: PlaybackInfo,
    duration: Option<Duration>,
    /// Source most recently assigned to the device.
    pending: Option<Url>,
    /// Source of the last `LoadStart` the device reported.
    loading: Option<Url>,
    /// The current source failed to load or resolve.
    failed: bool,
}

impl<D: MediaDevice> PlaybackController<D> {
    /// Takes ownership of `device` and queues the first track. The initial
    /// play request is made but is expected to be refused until the device
    /// has been resumed by a user gesture.
    pub fn new(mut device: D, resolver: SourceResolver, tracks: Vec<Track>) -> Self {
        let (tx, rx) = mpsc::channel();
        let subscription = device.subscribe(tx);

        let mut controller = Self {
            device,
            events: rx,
            subscription: Some(subscription),
            resolver,
            tracks,
            info: PlaybackInfo::default(),
            duration: None,
            pending: None,
            loading: None,
            failed: false,
        };

        if !controller.tracks.is_empty() {
            controller.load(0);
        }
        controller.pump();
        controller
    }

    pub fn info(&self) -> &PlaybackInfo {
        &self.info
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.info.current_index)
    }

    pub fn analysis_tap(&self) -> Option<AnalysisTap> {
        self.device.analysis_tap()
    }

    #[cfg(test)]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[cfg(test)]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Play if paused, pause if playing. Retries the current track if its
    /// source failed earlier. Play rejections are swallowed.
    pub fn toggle(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.ensure_resumed();

        if self.failed || self.pending.is_none() {
            self.load(self.info.current_index);
        } else if self.info.is_playing {
            self.device.pause();
        } else {
            self.request_play();
        }
        self.pump();
    }

    pub fn next(&mut self) {
        self.step(1);
        self.pump();
    }

    pub fn previous(&mut self) {
        self.step(-1);
        self.pump();
    }

    /// Jump to `index`. Out of range is a no-op; the current, already
    /// loaded track toggles instead of restarting.
    pub fn play_from_index(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        if index == self.info.current_index && self.pending.is_some() && !self.failed {
            self.toggle();
            return;
        }

        self.ensure_resumed();
        self.load(index);
        self.pump();
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.info.is_muted);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.device.set_muted(muted);
        self.pump();
    }

    /// Swap in a new canonical list. Keeps the current index when it still
    /// points at the same track, otherwise loads what is now there.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        let previous = self
            .current_track()
            .map(|t| (t.id.clone(), t.source.clone()));
        self.tracks = tracks;

        if self.tracks.is_empty() {
            self.device.pause();
            self.pump();
            self.pending = None;
            self.failed = false;
            self.duration = None;
            self.info.current_index = 0;
            self.info.progress = 0.0;
            self.info.phase = PlaybackPhase::Idle;
            tracing::info!("track list emptied");
            return;
        }

        let index = if self.info.current_index < self.tracks.len() {
            self.info.current_index
        } else {
            0
        };
        let unchanged = previous.is_some_and(|(id, source)| {
            let t = &self.tracks[index];
            t.id == id && t.source == source
        });

        if unchanged && self.pending.is_some() {
            self.info.current_index = index;
        } else {
            self.load(index);
        }
        self.pump();
    }

    /// Let the device report progress, then apply whatever it said.
    pub fn tick(&mut self) {
        self.device.poll();
        self.pump();
    }

    /// Apply every queued device event.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
    }

    fn step(&mut self, delta: isize) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        self.ensure_resumed();

        let index = (self.info.current_index as isize + delta).rem_euclid(len as isize) as usize;
        self.load(index);
    }

    fn ensure_resumed(&mut self) {
        if self.device.is_suspended() {
            if let Err(err) = self.device.resume() {
                tracing::warn!(%err, "could not resume audio output");
            }
        }
    }

    fn request_play(&mut self) {
        if let Err(err) = self.device.play() {
            tracing::debug!(%err, "play request rejected");
        }
    }

    /// Point the device at track `index` and ask it to play.
    fn load(&mut self, index: usize) {
        let Some(track) = self.tracks.get(index) else {
            return;
        };
        self.info.current_index = index;
        self.info.progress = 0.0;
        self.duration = None;

        match self.resolver.resolve(&track.source) {
            Ok(url) => {
                tracing::debug!(index, id = %track.id, %url, "assigning source");
                self.failed = false;
                self.pending = Some(url.clone());
                self.set_phase(PlaybackPhase::Loading);
                self.device.set_source(&url);
                self.request_play();
            }
            Err(err) => {
                tracing::warn!(index, id = %track.id, source = %track.source, %err, "unresolvable source");
                let notice = format!("could not load audio: {}", track.source);
                self.device.pause();
                self.pump();
                self.pending = None;
                self.failed = true;
                self.info.is_playing = false;
                self.info.notice = Some(notice);
                self.set_phase(PlaybackPhase::Paused);
            }
        }
    }

    fn is_current(&self) -> bool {
        self.pending.is_some() && self.pending == self.loading
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        self.info.phase = if self.tracks.is_empty() {
            PlaybackPhase::Idle
        } else {
            phase
        };
    }

    fn apply(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::LoadStart { source } => {
                self.loading = Some(source);
                if self.is_current() {
                    self.info.is_playing = false;
                    self.info.progress = 0.0;
                    self.duration = None;
                    self.set_phase(PlaybackPhase::Loading);
                }
            }
            DeviceEvent::VolumeChange { muted } => self.info.is_muted = muted,
            event if !self.is_current() => {
                tracing::trace!(?event, "dropping event from a superseded source");
            }
            DeviceEvent::LoadedMetadata { duration } => {
                self.duration = duration;
                self.info.notice = None;
                if self.info.phase == PlaybackPhase::Loading {
                    self.set_phase(PlaybackPhase::Paused);
                }
            }
            DeviceEvent::Play => {
                self.info.is_playing = true;
                self.set_phase(PlaybackPhase::Playing);
            }
            DeviceEvent::Pause => {
                self.info.is_playing = false;
                if self.info.phase == PlaybackPhase::Playing {
                    self.set_phase(PlaybackPhase::Paused);
                }
            }
            DeviceEvent::TimeUpdate { position, duration } => {
                if duration.is_some() {
                    self.duration = duration;
                }
                self.info.progress = progress_fraction(position, self.duration);
            }
            DeviceEvent::Ended => {
                tracing::debug!(index = self.info.current_index, "track ended");
                self.set_phase(PlaybackPhase::Advancing);
                self.step(1);
            }
            DeviceEvent::Error { source, message } => {
                if self.pending.as_ref() != Some(&source) {
                    return;
                }
                tracing::warn!(%source, %message, "audio failed to load");
                self.failed = true;
                self.info.is_playing = false;
                self.info.notice = Some(format!("could not load audio: {source}"));
                self.set_phase(PlaybackPhase::Paused);
            }
        }
    }
}

impl<D: MediaDevice> Drop for PlaybackController<D> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.device.unsubscribe(id);
        }
    }
}
