use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, WallError};

use super::model::{DEFAULT_COLOR, DEFAULT_POSITION, Track, is_hex_color};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// A record as the content backend hands it out. Every field may be missing
/// or `null`; defaults are applied in [`normalize`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTrack {
    #[serde(alias = "_id")]
    id: Option<String>,
    title: Option<String>,
    album: Option<String>,
    #[serde(alias = "src")]
    source: Option<String>,
    color: Option<String>,
    #[serde(alias = "tag")]
    label: Option<String>,
    #[serde(rename = "sortOrder", alias = "order", alias = "sort_order")]
    sort_order: Option<f64>,
    #[serde(rename = "createdAt", alias = "_createdAt", alias = "created_at")]
    created_at: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDoc {
    List(Vec<RawTrack>),
    Wrapped {
        #[serde(alias = "result")]
        tracks: Vec<RawTrack>,
    },
}

impl CatalogDoc {
    fn into_records(self) -> Vec<RawTrack> {
        match self {
            Self::List(v) => v,
            Self::Wrapped { tracks } => tracks,
        }
    }
}

/// Read and parse a catalog file.
pub fn load_catalog(path: &Path) -> Result<Vec<Track>> {
    let format =
        CatalogFormat::from_path(path).ok_or_else(|| WallError::UnsupportedFormat(path.to_path_buf()))?;
    let text = std::fs::read_to_string(path).map_err(|source| WallError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&text, format).map_err(|message| WallError::CatalogParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse catalog text into the canonical, sorted track list.
pub fn parse_catalog(text: &str, format: CatalogFormat) -> std::result::Result<Vec<Track>, String> {
    let doc: CatalogDoc = match format {
        CatalogFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
        CatalogFormat::Toml => toml::from_str(text).map_err(|e| e.to_string())?,
    };
    Ok(normalize(doc.into_records()))
}

/// Load the catalog, degrading to an empty wall on any failure.
pub fn fetch_tracks(path: Option<&Path>) -> Vec<Track> {
    let Some(path) = path else {
        tracing::warn!("no catalog configured, the wall is empty");
        return Vec::new();
    };

    match load_catalog(path) {
        Ok(tracks) => {
            tracing::info!(path = %path.display(), count = tracks.len(), "catalog loaded");
            tracks
        }
        Err(err) => {
            tracing::warn!(error = %err, "catalog unavailable, rendering an empty wall");
            Vec::new()
        }
    }
}

fn normalize(records: Vec<RawTrack>) -> Vec<Track> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tracks: Vec<Track> = Vec::with_capacity(records.len());

    for (pos, raw) in records.into_iter().enumerate() {
        let Some(id) = non_empty(raw.id) else {
            tracing::warn!(position = pos, "skipping catalog record without id");
            continue;
        };
        let Some(source) = non_empty(raw.source) else {
            tracing::warn!(%id, "skipping catalog record without audio source");
            continue;
        };
        if !seen.insert(id.clone()) {
            tracing::warn!(%id, "skipping catalog record with duplicate id");
            continue;
        }

        let title = non_empty(raw.title).unwrap_or_else(|| id.clone());
        let color = match non_empty(raw.color) {
            Some(c) if is_hex_color(&c) => c,
            Some(c) => {
                tracing::warn!(%id, color = %c, "ignoring invalid tag color");
                DEFAULT_COLOR.to_string()
            }
            None => DEFAULT_COLOR.to_string(),
        };

        let mut track = Track::new(id, title, source);
        if let Some(label) = non_empty(raw.label) {
            track.label = label;
        }
        tracks.push(Track {
            album: non_empty(raw.album),
            color,
            sort_order: raw.sort_order.filter(|o| o.is_finite()),
            created_at: non_empty(raw.created_at),
            x: position_or_default(raw.x),
            y: position_or_default(raw.y),
            ..track
        });
    }

    // Stable: ties keep the backend's order.
    tracks.sort_by(sort_key_cmp);
    tracks
}

/// Numeric order first, then creation time, then records with neither.
fn sort_key_cmp(a: &Track, b: &Track) -> Ordering {
    match (a.sort_order, b.sort_order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (&a.created_at, &b.created_at) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn position_or_default(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 100.0))
        .unwrap_or(DEFAULT_POSITION)
}
