use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_COLOR: &str = "#F4F1E8";
pub(crate) const DEFAULT_POSITION: f64 = 50.0;

/// `#RGB` or `#RRGGBB`, ASCII hex digits only.
pub(crate) fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|d| matches!(d.len(), 3 | 6) && d.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// One playable song tagged on the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub album: Option<String>,
    /// Stored audio reference, absolute or root-relative.
    pub source: String,
    /// Hex color of the tag glyph.
    pub color: String,
    /// Short graffiti word rendered on the tag.
    pub label: String,
    pub sort_order: Option<f64>,
    pub created_at: Option<String>,
    /// Manual position in percent. Auto-layout ignores it.
    pub x: f64,
    pub y: f64,
}

impl Track {
    /// Build a track with defaults for everything but the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            label: title.clone(),
            title,
            album: None,
            source: source.into(),
            color: DEFAULT_COLOR.to_string(),
            sort_order: None,
            created_at: None,
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
        }
    }

    /// Text shown on the tag, falling back to the title.
    pub fn tag_text(&self) -> &str {
        let label = self.label.trim();
        if label.is_empty() {
            self.title.as_str()
        } else {
            label
        }
    }
}
