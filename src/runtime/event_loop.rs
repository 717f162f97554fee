use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::App;
use crate::audio::MediaDevice;
use crate::library::Track;
use crate::playback::PlaybackController;
use crate::ui::{self, Chunks, WallView};
use crate::visualizer::Visualizer;

const FRAME: Duration = Duration::from_millis(33);

/// What a key press asks for. Every one of these counts as a user gesture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Next,
    Previous,
    Mute,
    CursorNext,
    CursorPrev,
    PlayCursor,
    /// Re-read the catalog and swap the list in place.
    Reload,
    Quit,
}

pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::Toggle,
        KeyCode::Char('l') | KeyCode::Char('n') => Action::Next,
        KeyCode::Char('h') | KeyCode::Char('b') => Action::Previous,
        KeyCode::Char('m') => Action::Mute,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => Action::CursorNext,
        KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => Action::CursorPrev,
        KeyCode::Enter => Action::PlayCursor,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Returns `false` when the wall should close.
pub fn apply_action<D: MediaDevice>(
    action: Action,
    app: &mut App,
    controller: &mut PlaybackController<D>,
    reload: &mut dyn FnMut() -> Vec<Track>,
) -> bool {
    match action {
        Action::Quit => return false,
        Action::Toggle => {
            app.follow_playback_on();
            controller.toggle();
        }
        Action::Next => {
            app.follow_playback_on();
            controller.next();
        }
        Action::Previous => {
            app.follow_playback_on();
            controller.previous();
        }
        Action::Mute => controller.toggle_mute(),
        Action::CursorNext => app.cursor_next(),
        Action::CursorPrev => app.cursor_prev(),
        Action::PlayCursor => {
            if let Some(index) = app.cursor_track_index() {
                app.follow_playback_on();
                controller.play_from_index(index);
            }
        }
        Action::Reload => {
            let tracks = reload();
            tracing::info!(count = tracks.len(), "catalog reloaded");
            controller.replace_tracks(tracks.clone());
            app.set_tracks(tracks);
        }
    }
    true
}

fn handle_key<D: MediaDevice>(
    key: KeyEvent,
    app: &mut App,
    controller: &mut PlaybackController<D>,
    reload: &mut dyn FnMut() -> Vec<Track>,
) -> bool {
    let action = key_action(key);

    // The first key only opens the wall.
    if app.dismiss_intro() {
        return action != Some(Action::Quit);
    }

    match action {
        Some(action) => apply_action(action, app, controller, reload),
        None => true,
    }
}

fn handle_mouse<D: MediaDevice>(
    mouse: MouseEvent,
    chunks: &Chunks,
    app: &mut App,
    controller: &mut PlaybackController<D>,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if app.dismiss_intro() {
        return;
    }

    let active = controller
        .current_track()
        .map(|_| controller.info().current_index);
    if let Some(index) = ui::tag_hit(app, chunks.wall_inner(), active, mouse.column, mouse.row) {
        tracing::debug!(index, "tag clicked");
        app.cursor = index;
        app.follow_playback_on();
        controller.play_from_index(index);
    }
}

/// Main terminal event loop: drives the controller, redraws, and handles
/// input. Returns `Ok(())` when the user quits.
pub fn run<D: MediaDevice>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    controller: &mut PlaybackController<D>,
    mut visualizer: Option<&mut Visualizer>,
    reload: &mut dyn FnMut() -> Vec<Track>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        controller.tick();
        app.follow(controller.info().current_index);

        let size = terminal.size()?;
        let chunks = ui::layout_chunks(Rect::new(0, 0, size.width, size.height), visualizer.is_some());
        app.relayout(size.width);

        let bars = match visualizer.as_deref_mut() {
            Some(v) => v.frame(controller.info().is_playing),
            None => Vec::new(),
        };

        let view = WallView {
            info: controller.info(),
            current: controller.current_track(),
            bars: &bars,
        };
        terminal.draw(|f| ui::draw(f, app, &view))?;

        if !event::poll(FRAME)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(key, app, controller, reload) {
                    tracing::info!("quit requested");
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse(mouse, &chunks, app, controller),
            // Resizes relayout on the next frame from the new size.
            _ => {}
        }
    }
}
