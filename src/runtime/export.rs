use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::Settings;
use crate::layout::{Breakpoints, PlacedTrack, ViewportClass, compute_layout};

use super::load_tracks;

/// What the headless layout is computed for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutTarget {
    Class(ViewportClass),
    /// Width in px, classified with the configured breakpoints.
    Width(u32),
}

impl LayoutTarget {
    pub fn resolve(self, breakpoints: Breakpoints) -> ViewportClass {
        match self {
            Self::Class(class) => class,
            Self::Width(px) => ViewportClass::classify(px, breakpoints),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub viewport: ViewportClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
    pub count: usize,
    pub tracks: Vec<PlacedTrack>,
}

pub fn build_report(settings: &Settings, catalog: Option<&Path>, target: LayoutTarget) -> LayoutReport {
    let tracks = load_tracks(settings, catalog);
    let viewport = target.resolve(Breakpoints::from(&settings.layout));
    let placed = compute_layout(&tracks, viewport);

    LayoutReport {
        viewport,
        width_px: match target {
            LayoutTarget::Width(px) => Some(px),
            LayoutTarget::Class(_) => None,
        },
        count: placed.len(),
        tracks: placed,
    }
}

/// Print the placed tracks for `target` as JSON on stdout.
pub fn run_layout(catalog: Option<&Path>, target: LayoutTarget) -> Result<(), Box<dyn std::error::Error>> {
    let settings = super::settings::load_settings();
    super::logging::init_stderr(&settings.log);

    let report = build_report(&settings, catalog, target);
    tracing::info!(viewport = report.viewport.as_str(), count = report.count, "layout computed");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}
