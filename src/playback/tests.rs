use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use url::Url;

use super::*;
use crate::audio::{DeviceError, DeviceEvent, MediaDevice, SourceResolver, SubscriptionId, Subscribers};
use crate::library::Track;

const TRACK_LEN: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetSource(Url),
    Play,
    Pause,
    Resume,
}

/// Scripted stand-in for an output device.
#[derive(Default)]
struct MockDevice {
    subscribers: Subscribers,
    live_subscriptions: Rc<Cell<usize>>,
    calls: Vec<Call>,
    source: Option<Url>,
    playing: bool,
    muted: bool,
    suspended: bool,
    broken: HashSet<String>,
    /// Hold emitted events until `flush`, like a device that loads async.
    deferred: bool,
    queued: Vec<DeviceEvent>,
}

impl MockDevice {
    fn resumed() -> Self {
        Self::default()
    }

    fn suspended() -> Self {
        Self {
            suspended: true,
            ..Self::default()
        }
    }

    fn emit(&mut self, event: DeviceEvent) {
        if self.deferred {
            self.queued.push(event);
        } else {
            self.subscribers.emit(event);
        }
    }

    fn flush(&mut self) {
        for event in std::mem::take(&mut self.queued) {
            self.subscribers.emit(event);
        }
    }

    fn report_time(&mut self, position: Duration) {
        self.emit(DeviceEvent::TimeUpdate {
            position,
            duration: Some(TRACK_LEN),
        });
    }

    fn finish(&mut self) {
        self.playing = false;
        self.emit(DeviceEvent::Pause);
        self.emit(DeviceEvent::Ended);
    }

    fn sources(&self) -> Vec<&Url> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetSource(u) => Some(u),
                _ => None,
            })
            .collect()
    }
}

impl MediaDevice for MockDevice {
    fn set_source(&mut self, source: &Url) {
        self.calls.push(Call::SetSource(source.clone()));
        if self.playing {
            self.playing = false;
            self.emit(DeviceEvent::Pause);
        }
        self.source = Some(source.clone());
        self.emit(DeviceEvent::LoadStart {
            source: source.clone(),
        });
        if self.broken.contains(source.as_str()) {
            self.emit(DeviceEvent::Error {
                source: source.clone(),
                message: "404".into(),
            });
        } else {
            self.emit(DeviceEvent::LoadedMetadata {
                duration: Some(TRACK_LEN),
            });
        }
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.calls.push(Call::Play);
        if self.suspended {
            return Err(DeviceError::NotAllowed);
        }
        let loaded = self
            .source
            .as_ref()
            .is_some_and(|s| !self.broken.contains(s.as_str()));
        if !loaded {
            return Err(DeviceError::NoSource);
        }
        if !self.playing {
            self.playing = true;
            self.emit(DeviceEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        if self.playing {
            self.playing = false;
            self.emit(DeviceEvent::Pause);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.emit(DeviceEvent::VolumeChange { muted });
        }
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        self.calls.push(Call::Resume);
        self.suspended = false;
        Ok(())
    }

    fn subscribe(&mut self, listener: Sender<DeviceEvent>) -> SubscriptionId {
        self.live_subscriptions.set(self.live_subscriptions.get() + 1);
        self.subscribers.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if self.subscribers.unsubscribe(id) {
            self.live_subscriptions.set(self.live_subscriptions.get() - 1);
        }
    }
}

fn resolver() -> SourceResolver {
    SourceResolver::parse("https://wall.example/site/").unwrap()
}

fn abc() -> Vec<Track> {
    ["a", "b", "c"]
        .into_iter()
        .map(|id| Track::new(id, id.to_uppercase(), format!("/audio/{id}.mp3")))
        .collect()
}

fn url(id: &str) -> Url {
    Url::parse(&format!("https://wall.example/site/audio/{id}.mp3")).unwrap()
}

fn controller(device: MockDevice, tracks: Vec<Track>) -> PlaybackController<MockDevice> {
    PlaybackController::new(device, resolver(), tracks)
}

#[test]
fn progress_fraction_clamps_and_handles_unknown_duration() {
    let d = Duration::from_millis(1234);
    assert_eq!(progress_fraction(d, Some(d)), 1.0);
    assert_eq!(progress_fraction(d * 2, Some(d)), 1.0);
    assert_eq!(progress_fraction(d, None), 0.0);
    assert_eq!(progress_fraction(d, Some(Duration::ZERO)), 0.0);
    assert!((progress_fraction(d / 2, Some(d)) - 0.5).abs() < 1e-9);
}

#[test]
fn starts_at_index_zero_with_source_assigned_before_play() {
    let c = controller(MockDevice::resumed(), abc());
    assert_eq!(c.info().current_index, 0);
    assert_eq!(
        c.device().calls[..2],
        [Call::SetSource(url("a")), Call::Play]
    );
    assert!(c.info().is_playing);
    assert_eq!(c.info().phase, PlaybackPhase::Playing);
}

#[test]
fn previous_from_first_wraps_to_last() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.previous();
    assert_eq!(c.info().current_index, 2);
    assert_eq!(c.current_track().map(|t| t.id.as_str()), Some("c"));
}

#[test]
fn next_three_times_wraps_back_to_start() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.next();
    c.next();
    assert_eq!(c.info().current_index, 2);
    c.next();
    assert_eq!(c.info().current_index, 0);

    let sources: Vec<&str> = c.device().sources().iter().map(|u| u.as_str()).collect();
    assert_eq!(
        sources,
        vec![url("a").as_str(), url("b").as_str(), url("c").as_str(), url("a").as_str()]
    );
}

#[test]
fn empty_list_operations_are_safe_and_stay_idle() {
    let mut c = controller(MockDevice::resumed(), Vec::new());
    c.next();
    c.previous();
    c.play_from_index(0);
    c.toggle();
    c.tick();

    assert_eq!(c.info().phase, PlaybackPhase::Idle);
    assert!(!c.info().is_playing);
    assert!(c.current_track().is_none());
    assert!(c.device().calls.is_empty());
}

#[test]
fn toggling_mute_twice_restores_state_without_touching_position() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.next();
    c.device_mut().report_time(Duration::from_secs(45));
    c.pump();
    let before = c.info().clone();

    c.toggle_mute();
    assert!(c.info().is_muted);
    assert!(c.info().is_playing);
    c.toggle_mute();

    assert_eq!(c.info(), &before);
}

#[test]
fn progress_reaches_exactly_one_at_the_end() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.device_mut().report_time(TRACK_LEN);
    c.pump();
    assert_eq!(c.info().progress, 1.0);

    c.device_mut().report_time(TRACK_LEN + Duration::from_millis(3));
    c.pump();
    assert_eq!(c.info().progress, 1.0);
}

#[test]
fn autoplay_rejection_is_swallowed_until_a_gesture_resumes() {
    let mut c = controller(MockDevice::suspended(), abc());
    assert!(!c.info().is_playing);
    assert_eq!(c.info().phase, PlaybackPhase::Paused);
    assert_eq!(c.info().notice, None);

    c.toggle();
    let calls = &c.device().calls;
    let resume_at = calls.iter().position(|x| *x == Call::Resume).unwrap();
    let play_at = calls.iter().rposition(|x| *x == Call::Play).unwrap();
    assert!(resume_at < play_at);
    assert!(c.info().is_playing);
    assert_eq!(c.info().phase, PlaybackPhase::Playing);
}

#[test]
fn toggle_pauses_a_playing_track() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.toggle();
    assert!(!c.info().is_playing);
    assert_eq!(c.info().phase, PlaybackPhase::Paused);
    assert_eq!(c.info().current_index, 0);
}

#[test]
fn load_error_sets_notice_and_controller_stays_usable() {
    let mut device = MockDevice::resumed();
    device.broken.insert(url("b").to_string());
    let mut c = controller(device, abc());

    c.next();
    assert_eq!(c.info().current_index, 1);
    assert!(!c.info().is_playing);
    assert_eq!(
        c.info().notice.as_deref(),
        Some("could not load audio: https://wall.example/site/audio/b.mp3")
    );

    c.next();
    assert_eq!(c.info().current_index, 2);
    assert!(c.info().is_playing);
    assert_eq!(c.info().notice, None);
}

#[test]
fn unresolvable_source_is_reported_without_panicking() {
    let mut tracks = abc();
    tracks[1].source = "http://[broken".into();
    let mut c = controller(MockDevice::resumed(), tracks);

    c.next();
    assert_eq!(c.info().current_index, 1);
    assert!(!c.info().is_playing);
    assert!(c.info().notice.as_deref().unwrap().starts_with("could not load audio"));

    c.play_from_index(0);
    assert!(c.info().is_playing);
}

#[test]
fn events_from_superseded_sources_are_dropped() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.device_mut().deferred = true;

    c.play_from_index(2);
    // The old source is still reporting before the device acknowledges the
    // new one.
    c.device_mut().subscribers.emit(DeviceEvent::TimeUpdate {
        position: Duration::from_secs(90),
        duration: Some(TRACK_LEN),
    });
    c.device_mut().subscribers.emit(DeviceEvent::Ended);
    c.pump();
    assert_eq!(c.info().current_index, 2);
    assert_eq!(c.info().progress, 0.0);

    c.device_mut().flush();
    c.pump();
    assert_eq!(c.info().current_index, 2);
    assert_eq!(c.info().phase, PlaybackPhase::Playing);
    assert_eq!(c.device().source.as_ref(), Some(&url("c")));
}

#[test]
fn rapid_source_changes_settle_on_the_last_request() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.device_mut().deferred = true;

    c.next();
    c.next();
    // The intermediate source runs out before the device catches up.
    c.device_mut().report_time(TRACK_LEN);
    c.device_mut().finish();
    c.play_from_index(0);
    c.pump();
    assert_eq!(c.info().current_index, 0);
    assert_eq!(c.info().phase, PlaybackPhase::Loading);

    c.device_mut().flush();
    c.pump();

    let sources: Vec<&str> = c.device().sources().iter().map(|u| u.as_str()).collect();
    assert_eq!(sources, [url("a").as_str(), url("b").as_str(), url("c").as_str(), url("a").as_str()]);
    assert_eq!(c.device().source.as_ref(), Some(&url("a")));
    assert_eq!(c.info().current_index, 0);
    assert_eq!(c.info().progress, 0.0);
    assert_eq!(c.info().phase, PlaybackPhase::Playing);
    assert!(c.info().is_playing);
}

#[test]
fn natural_end_advances_to_the_next_track() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.device_mut().finish();
    c.tick();

    assert_eq!(c.info().current_index, 1);
    assert!(c.info().is_playing);
    assert_eq!(c.info().phase, PlaybackPhase::Playing);
}

#[test]
fn play_from_index_out_of_range_is_a_no_op() {
    let mut c = controller(MockDevice::resumed(), abc());
    let calls = c.device().calls.len();
    c.play_from_index(3);
    c.play_from_index(usize::MAX);
    assert_eq!(c.info().current_index, 0);
    assert_eq!(c.device().calls.len(), calls);
}

#[test]
fn play_from_index_on_current_track_toggles() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.play_from_index(0);
    assert!(!c.info().is_playing);
    c.play_from_index(0);
    assert!(c.info().is_playing);
    assert_eq!(c.device().sources().len(), 1);
}

#[test]
fn replace_tracks_goes_idle_when_emptied_and_reloads_after() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.next();

    c.replace_tracks(Vec::new());
    assert_eq!(c.info().phase, PlaybackPhase::Idle);
    assert!(!c.info().is_playing);
    c.next();
    assert_eq!(c.info().phase, PlaybackPhase::Idle);

    c.replace_tracks(abc());
    assert_eq!(c.info().current_index, 0);
    assert_eq!(c.device().source.as_ref(), Some(&url("a")));
}

#[test]
fn replace_tracks_keeps_the_playing_track_when_unchanged() {
    let mut c = controller(MockDevice::resumed(), abc());
    c.next();
    let loads = c.device().sources().len();

    let mut more = abc();
    more.push(Track::new("d", "D", "/audio/d.mp3"));
    c.replace_tracks(more);

    assert_eq!(c.info().current_index, 1);
    assert_eq!(c.device().sources().len(), loads);
    assert!(c.info().is_playing);
}

#[test]
fn dropping_the_controller_unsubscribes() {
    let device = MockDevice::resumed();
    let live = device.live_subscriptions.clone();
    let c = controller(device, abc());
    assert_eq!(live.get(), 1);
    drop(c);
    assert_eq!(live.get(), 0);
}
