//! Deterministic tag placement on the wall.
//!
//! A viewport class picks one placement strategy; the strategy maps the
//! canonical track list to percentage coordinates. Jitter is derived from
//! each track's id, so the same list always lands in the same spots.

mod jitter;
mod strategy;

use serde::Serialize;

use crate::config::LayoutSettings;
use crate::library::Track;

pub use jitter::{fnv1a, seeded_float};
pub use strategy::{BandGrid, PlacementStrategy, Stack, Zone, ZoneScatter, WIDE_ZONES};

/// A track with its computed spot on the wall.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub computed_x: f64,
    pub computed_y: f64,
    /// Position in the canonical list; playback is addressed by this.
    pub original_index: usize,
    /// Resting tilt of the tag in degrees.
    pub rotation: f64,
}

/// Discrete width bucket selecting the placement strategy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Narrow,
    Medium,
    Wide,
}

/// Width thresholds in px; a width below `narrow_max` is narrow, below
/// `medium_max` is medium, anything else is wide.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    pub narrow_max: u32,
    pub medium_max: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            narrow_max: 560,
            medium_max: 800,
        }
    }
}

impl From<&LayoutSettings> for Breakpoints {
    fn from(s: &LayoutSettings) -> Self {
        Self {
            narrow_max: s.narrow_max_px,
            medium_max: s.medium_max_px,
        }
    }
}

static WIDE: ZoneScatter = ZoneScatter {
    zones: &WIDE_ZONES,
    spread: 1.2,
    salt_x: "-jx",
    salt_y: "-jy",
};

static MEDIUM: BandGrid = BandGrid {
    columns: 5,
    bands: [30.0, 70.0],
    spread_x: 1.5,
    spread_y: 0.8,
    salt_x: "-mx",
    salt_y: "-my",
};

static NARROW: Stack = Stack {
    x: 50.0,
    top: 18.0,
    bottom: 82.0,
    step: 7.5,
};

impl ViewportClass {
    pub fn classify(width_px: u32, breakpoints: Breakpoints) -> Self {
        if width_px < breakpoints.narrow_max {
            Self::Narrow
        } else if width_px < breakpoints.medium_max {
            Self::Medium
        } else {
            Self::Wide
        }
    }

    pub fn strategy(self) -> &'static dyn PlacementStrategy {
        match self {
            Self::Narrow => &NARROW,
            Self::Medium => &MEDIUM,
            Self::Wide => &WIDE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Medium => "medium",
            Self::Wide => "wide",
        }
    }
}

/// Place `tracks` for the given viewport class. Pure: the same input always
/// yields the same coordinates.
pub fn compute_layout(tracks: &[Track], viewport: ViewportClass) -> Vec<PlacedTrack> {
    let strategy = viewport.strategy();
    let placed = strategy.place(tracks);

    debug_assert_eq!(placed.len(), tracks.len());
    debug_assert!(placed.iter().all(|p| {
        strategy
            .declared_bounds(p.original_index, tracks.len())
            .contains(p.computed_x, p.computed_y)
    }));

    placed
}

pub(crate) fn tag_rotation(id: &str) -> f64 {
    seeded_float(&format!("{id}-base"), -5.0, 5.0)
}
