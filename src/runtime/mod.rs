use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{RodioDevice, SourceResolver};
use crate::config::Settings;
use crate::error::Result;
use crate::library::{Track, fetch_tracks, lint_sources};
use crate::playback::PlaybackController;
use crate::visualizer::Visualizer;

mod event_loop;
mod export;
mod logging;
mod settings;

pub use export::{LayoutTarget, run_layout};

/// Catalog from the command line, else from config.
fn catalog_path(settings: &Settings, cli: Option<&Path>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| settings.content.catalog.clone())
}

/// Load, sort and self-check the catalog. Failures yield an empty wall.
fn load_tracks(settings: &Settings, cli_catalog: Option<&Path>) -> Vec<Track> {
    let catalog = catalog_path(settings, cli_catalog);
    let tracks = fetch_tracks(catalog.as_deref());
    lint_sources(&tracks, &settings.content.base_path);
    tracks
}

/// Media root from config, else the catalog's directory, else the working
/// directory.
fn build_resolver(settings: &Settings, catalog: Option<&Path>) -> Result<SourceResolver> {
    if let Some(root) = settings.content.media_root.as_deref() {
        return SourceResolver::parse(root);
    }

    let dir = catalog
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    SourceResolver::for_directory(dir)
}

pub fn run_wall(cli_catalog: Option<&Path>) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init_for_wall(&settings.log);

    let catalog = catalog_path(&settings, cli_catalog);
    let tracks = load_tracks(&settings, cli_catalog);
    let resolver = build_resolver(&settings, catalog.as_deref())?;
    tracing::info!(count = tracks.len(), root = %resolver.root(), "opening wall");

    let device = RodioDevice::new(Duration::from_millis(settings.audio.time_update_ms));
    let mut controller = PlaybackController::new(device, resolver, tracks.clone());
    if settings.audio.start_muted {
        controller.set_muted(true);
    }

    let mut visualizer = if settings.visualizer.enabled {
        controller
            .analysis_tap()
            .map(|tap| Visualizer::attach(tap, &settings.visualizer))
    } else {
        None
    };

    let mut app = App::new(tracks, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut reload = || load_tracks(&settings, cli_catalog);
    let run_result = event_loop::run(
        &mut terminal,
        &mut app,
        &mut controller,
        visualizer.as_mut(),
        &mut reload,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}
