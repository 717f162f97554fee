//! `MediaDevice` backed by a `rodio` output stream.
//!
//! The output stream is not opened until `resume()`; until then the device
//! is suspended and refuses to play, but it still decodes and reports
//! metadata for whatever source it is given.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use url::Url;

use super::tap::{AnalysisTap, TapSource};
use super::types::{DeviceError, DeviceEvent, MediaDevice, SubscriptionId, Subscribers};

type Staged = TapSource<Decoder<BufReader<File>>>;

pub struct RodioDevice {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    /// Decoded source waiting for the output to open.
    staged: Option<Staged>,
    source: Option<Url>,
    duration: Option<Duration>,
    muted: bool,
    playing: bool,
    subscribers: Subscribers,
    tap: AnalysisTap,
    time_update: Duration,
    last_update: Option<Instant>,
}

impl RodioDevice {
    pub fn new(time_update: Duration) -> Self {
        Self {
            stream: None,
            sink: None,
            staged: None,
            source: None,
            duration: None,
            muted: false,
            playing: false,
            subscribers: Subscribers::default(),
            tap: AnalysisTap::new(),
            time_update,
            last_update: None,
        }
    }

    #[cfg(test)]
    pub fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    fn volume(&self) -> f32 {
        if self.muted { 0.0 } else { 1.0 }
    }

    fn open(&self, url: &Url) -> Result<(Staged, Option<Duration>), String> {
        if url.scheme() != "file" {
            return Err(format!("unsupported scheme `{}`", url.scheme()));
        }
        let path = url
            .to_file_path()
            .map_err(|()| "not a local file path".to_string())?;
        let file = File::open(&path).map_err(|e| e.to_string())?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())?;

        let duration = decoder.total_duration().or_else(|| probe_duration(&path));
        Ok((TapSource::new(decoder, self.tap.clone()), duration))
    }

    /// Move a staged source onto a fresh paused sink once the output exists.
    fn attach(&mut self) {
        let Some(stream) = self.stream.as_ref() else {
            return;
        };
        let Some(source) = self.staged.take() else {
            return;
        };

        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(self.volume());
        sink.append(source);
        sink.pause();
        self.sink = Some(sink);
    }

    fn stop_current(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.staged = None;
        self.duration = None;
        self.last_update = None;
        self.tap.clear();
        if self.playing {
            self.playing = false;
            self.subscribers.emit(DeviceEvent::Pause);
        }
    }
}

fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

impl MediaDevice for RodioDevice {
    fn set_source(&mut self, source: &Url) {
        self.stop_current();
        self.source = Some(source.clone());
        self.subscribers.emit(DeviceEvent::LoadStart {
            source: source.clone(),
        });

        match self.open(source) {
            Ok((staged, duration)) => {
                tracing::debug!(%source, ?duration, "source loaded");
                self.staged = Some(staged);
                self.duration = duration;
                self.attach();
                self.subscribers
                    .emit(DeviceEvent::LoadedMetadata { duration });
            }
            Err(message) => {
                tracing::warn!(%source, %message, "failed to load source");
                self.subscribers.emit(DeviceEvent::Error {
                    source: source.clone(),
                    message,
                });
            }
        }
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.stream.is_none() {
            return Err(DeviceError::NotAllowed);
        }
        self.attach();

        let sink = self.sink.as_ref().ok_or(DeviceError::NoSource)?;
        if sink.empty() {
            return Err(DeviceError::NoSource);
        }
        sink.play();

        if !self.playing {
            self.playing = true;
            self.last_update = None;
            self.subscribers.emit(DeviceEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        if self.playing {
            self.playing = false;
            self.subscribers.emit(DeviceEvent::Pause);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume());
        }
        self.subscribers.emit(DeviceEvent::VolumeChange { muted });
    }

    fn is_suspended(&self) -> bool {
        self.stream.is_none()
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| DeviceError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream drops, which would land on
        // top of the TUI.
        stream.log_on_drop(false);
        self.stream = Some(stream);
        tracing::info!("audio output resumed");

        self.attach();
        Ok(())
    }

    fn subscribe(&mut self, listener: Sender<DeviceEvent>) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    fn poll(&mut self) {
        if !self.playing {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            let position = self.duration.unwrap_or_else(|| sink.get_pos());
            self.playing = false;
            self.sink = None;
            self.subscribers.emit(DeviceEvent::TimeUpdate {
                position,
                duration: self.duration,
            });
            self.subscribers.emit(DeviceEvent::Pause);
            self.subscribers.emit(DeviceEvent::Ended);
            return;
        }

        let due = self
            .last_update
            .is_none_or(|at| at.elapsed() >= self.time_update);
        if due {
            let position = sink.get_pos();
            self.last_update = Some(Instant::now());
            self.subscribers.emit(DeviceEvent::TimeUpdate {
                position,
                duration: self.duration,
            });
        }
    }

    fn analysis_tap(&self) -> Option<AnalysisTap> {
        Some(self.tap.clone())
    }
}
