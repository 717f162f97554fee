use std::path::PathBuf;

use serde::Deserialize;

/// Everything `tagwall` reads from `config.toml`. Every field has a default,
/// so an empty or missing file is valid.
///
/// Layers, later ones winning: struct defaults, the config file, then
/// `TAGWALL__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub content: ContentSettings,
    pub layout: LayoutSettings,
    pub audio: AudioSettings,
    pub visualizer: VisualizerSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Catalog file (`.json` or `.toml`). The command line flag wins over this.
    pub catalog: Option<PathBuf>,
    /// Base URL that relative and root-relative sources are joined onto.
    /// Defaults to the catalog's directory.
    pub media_root: Option<String>,
    /// Deployment path prefix that must not leak into stored sources,
    /// e.g. `/eastwick-bully/`. Empty disables the check.
    pub base_path: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            catalog: None,
            media_root: None,
            base_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Widths below this many px use the single-column layout.
    pub narrow_max_px: u32,
    /// Widths below this many px (and not narrow) use the 5-column grid.
    pub medium_max_px: u32,
    /// Assumed width of one terminal cell in px.
    pub cell_width_px: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            narrow_max_px: 560,
            medium_max_px: 800,
            cell_width_px: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Start with output muted.
    pub start_muted: bool,
    /// Minimum interval between time updates (milliseconds).
    pub time_update_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            start_muted: false,
            time_update_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    pub enabled: bool,
    /// FFT window length in samples (power of two).
    pub fft_size: usize,
    /// Number of bars drawn.
    pub bars: usize,
    /// Temporal smoothing applied to magnitudes, 0 disables it.
    pub smoothing: f32,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fft_size: 128,
            bars: 24,
            smoothing: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Cover the wall with a splash until the first key press.
    pub show_intro: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " EASTWICK BULLY ~ digital manifesto ".to_string(),
            show_intro: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file for the wall. Without one nothing is logged while the TUI runs.
    pub file: Option<PathBuf>,
    /// Default filter directive, overridden by `TAGWALL_LOG`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}
