//! Device-facing types: the event stream, transport errors and the
//! `MediaDevice` seam the playback controller drives.

use std::sync::mpsc::Sender;
use std::time::Duration;

use url::Url;

use super::tap::AnalysisTap;

/// Native events an output device reports. The controller reconciles its
/// state from these rather than from the calls it made.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A new source was assigned; everything before this belongs to an
    /// older source.
    LoadStart { source: Url },
    LoadedMetadata { duration: Option<Duration> },
    Play,
    Pause,
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    VolumeChange { muted: bool },
    /// The source played to its natural end.
    Ended,
    Error { source: Url, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Play requested while the output pipeline is still suspended.
    #[error("playback is not allowed until the output is resumed")]
    NotAllowed,
    #[error("no playable source is loaded")]
    NoSource,
    #[error("audio output failed: {0}")]
    Output(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered event listeners of one device.
#[derive(Debug, Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Sender<DeviceEvent>)>,
}

impl Subscribers {
    pub fn subscribe(&mut self, listener: Sender<DeviceEvent>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener, forgetting the ones whose
    /// receiver is gone.
    pub fn emit(&mut self, event: DeviceEvent) {
        self.listeners
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// A single output device with one source slot.
///
/// Calls request a change; the resulting state arrives as [`DeviceEvent`]s
/// on every subscribed channel.
pub trait MediaDevice {
    /// Assign a new source, replacing (and stopping) the current one.
    fn set_source(&mut self, source: &Url);

    fn play(&mut self) -> Result<(), DeviceError>;

    fn pause(&mut self);

    fn set_muted(&mut self, muted: bool);

    /// `true` until the output pipeline has been resumed by a user gesture.
    fn is_suspended(&self) -> bool;

    fn resume(&mut self) -> Result<(), DeviceError>;

    fn subscribe(&mut self, listener: Sender<DeviceEvent>) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Give the device a chance to report progress and end-of-source.
    fn poll(&mut self) {}

    /// The device's one analysis tap, if it has one.
    fn analysis_tap(&self) -> Option<AnalysisTap> {
        None
    }
}
