//! Wall view state: the placed tags, the tag cursor and the intro gate.
//!
//! Transport state is not kept here; it belongs to the playback controller
//! and is passed to the renderer alongside this model.

use crate::config::Settings;
use crate::layout::{Breakpoints, PlacedTrack, ViewportClass, compute_layout};
use crate::library::Track;

pub struct App {
    pub tracks: Vec<Track>,
    pub placed: Vec<PlacedTrack>,
    /// Class the current `placed` list was computed for.
    pub viewport: Option<ViewportClass>,
    breakpoints: Breakpoints,
    cell_width_px: u32,

    /// Canonical index of the tag under the cursor.
    pub cursor: usize,
    /// Cursor tracks the playing tag until the user moves it.
    pub follow_playback: bool,

    /// Splash shown until the first key press.
    pub intro: bool,
    pub header_text: String,
}

impl App {
    pub fn new(tracks: Vec<Track>, settings: &Settings) -> Self {
        Self {
            tracks,
            placed: Vec::new(),
            viewport: None,
            breakpoints: Breakpoints::from(&settings.layout),
            cell_width_px: settings.layout.cell_width_px.max(1),
            cursor: 0,
            follow_playback: true,
            intro: settings.ui.show_intro,
            header_text: settings.ui.header_text.clone(),
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Viewport class for a wall `columns` cells wide.
    pub fn classify(&self, columns: u16) -> ViewportClass {
        let width_px = u32::from(columns).saturating_mul(self.cell_width_px);
        ViewportClass::classify(width_px, self.breakpoints)
    }

    /// Recompute placement if the class for `columns` differs from the one
    /// already laid out. Returns whether anything changed.
    pub fn relayout(&mut self, columns: u16) -> bool {
        let class = self.classify(columns);
        if self.viewport == Some(class) {
            return false;
        }
        tracing::debug!(columns, viewport = class.as_str(), "relayout");
        self.placed = compute_layout(&self.tracks, class);
        self.viewport = Some(class);
        true
    }

    /// Replace the list; the next `relayout` recomputes from scratch.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.placed.clear();
        self.viewport = None;
        if self.cursor >= self.tracks.len() {
            self.cursor = 0;
        }
    }

    pub fn placed_for(&self, original_index: usize) -> Option<&PlacedTrack> {
        self.placed
            .iter()
            .find(|p| p.original_index == original_index)
    }

    /// Hide the splash. Returns `true` if it was showing.
    pub fn dismiss_intro(&mut self) -> bool {
        std::mem::replace(&mut self.intro, false)
    }

    pub fn cursor_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.follow_playback = false;
        self.cursor = (self.cursor + 1) % self.tracks.len();
    }

    pub fn cursor_prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.follow_playback = false;
        self.cursor = (self.cursor + self.tracks.len() - 1) % self.tracks.len();
    }

    /// Index to hand to `play_from_index` for the tag under the cursor.
    pub fn cursor_track_index(&self) -> Option<usize> {
        (self.cursor < self.tracks.len()).then_some(self.cursor)
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Move the cursor onto the playing tag when following.
    pub fn follow(&mut self, current_index: usize) {
        if self.follow_playback && current_index < self.tracks.len() {
            self.cursor = current_index;
        }
    }
}
