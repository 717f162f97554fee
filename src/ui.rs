//! UI rendering helpers for the terminal user interface.
//!
//! The wall is drawn straight into the frame buffer: each placed tag is a
//! short run of text centered on its percentage coordinates.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::layout::PlacedTrack;
use crate::library::Track;
use crate::playback::{PlaybackInfo, PlaybackPhase};

const NEON: Color = Color::Rgb(0x00, 0xFF, 0xC2);
const DEVILS: Color = Color::Rgb(0xCE, 0x11, 0x26);
const SUNSET: Color = Color::Rgb(0xFF, 0xB0, 0x00);
const PAPER: Color = Color::Rgb(0xF4, 0xF1, 0xE8);

const CONTROLS: [(&str, &str); 8] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("j/k", "move cursor"),
    ("enter", "play tag"),
    ("click", "play tag"),
    ("m", "mute"),
    ("r", "reload"),
    ("q", "quit"),
];

/// Transport state handed to the renderer for one frame.
pub struct WallView<'a> {
    pub info: &'a PlaybackInfo,
    pub current: Option<&'a Track>,
    /// Spectrum bar heights in `[0, 1]`; empty hides the strip.
    pub bars: &'a [f32],
}

/// Screen regions, top to bottom.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Chunks {
    pub header: Rect,
    pub wall: Rect,
    pub bars: Rect,
    pub player: Rect,
    pub footer: Rect,
}

impl Chunks {
    /// Area inside the wall's border where tags are placed.
    pub fn wall_inner(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.wall)
    }
}

pub fn layout_chunks(area: Rect, show_bars: bool) -> Chunks {
    let bars_height = if show_bars { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(bars_height),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    Chunks {
        header: chunks[0],
        wall: chunks[1],
        bars: chunks[2],
        player: chunks[3],
        footer: chunks[4],
    }
}

/// `#RRGGBB` or `#RGB` to a terminal color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match digits.len() {
        6 => Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                let v = channel(&digits[i..i + 1])?;
                *slot = v * 17;
            }
            Some(Color::Rgb(rgb[0], rgb[1], rgb[2]))
        }
        _ => None,
    }
}

fn tag_text(track: &Track) -> String {
    format!(" {} ", track.tag_text())
}

/// Cells a tag occupies inside `inner`.
pub fn tag_rect(inner: Rect, placed: &PlacedTrack) -> Rect {
    if inner.width == 0 || inner.height == 0 {
        return Rect::new(inner.x, inner.y, 0, 0);
    }

    let width = (tag_text(&placed.track).chars().count() as u16).min(inner.width);
    let span = |extent: u16, pct: f64| -> u16 {
        let max = f64::from(extent.saturating_sub(1));
        (pct.clamp(0.0, 100.0) / 100.0 * max).round() as u16
    };

    let cx = inner.x + span(inner.width, placed.computed_x);
    let cy = inner.y + span(inner.height, placed.computed_y);
    let left = cx
        .saturating_sub(width / 2)
        .clamp(inner.x, inner.right() - width);

    Rect::new(left, cy, width, 1)
}

/// Draw order: every tag, then the cursor tag, then the active tag on top.
fn draw_order(app: &App, active: Option<usize>) -> Vec<&PlacedTrack> {
    let cursor = app.cursor_track_index();
    let mut order: Vec<&PlacedTrack> = app
        .placed
        .iter()
        .filter(|p| Some(p.original_index) != cursor && Some(p.original_index) != active)
        .collect();

    if let Some(p) = cursor.filter(|c| Some(*c) != active).and_then(|c| app.placed_for(c)) {
        order.push(p);
    }
    if let Some(p) = active.and_then(|a| app.placed_for(a)) {
        order.push(p);
    }
    order
}

/// Canonical index of the topmost tag under cell (`column`, `row`).
pub fn tag_hit(app: &App, inner: Rect, active: Option<usize>, column: u16, row: u16) -> Option<usize> {
    draw_order(app, active)
        .into_iter()
        .rev()
        .find(|p| {
            let r = tag_rect(inner, p);
            row == r.y && column >= r.x && column < r.right()
        })
        .map(|p| p.original_index)
}

fn active_index(view: &WallView) -> Option<usize> {
    view.current.map(|_| view.info.current_index)
}

fn draw_wall(buf: &mut Buffer, inner: Rect, app: &App, view: &WallView) {
    let active = active_index(view);
    let cursor = app.cursor_track_index();

    for placed in draw_order(app, active) {
        let rect = tag_rect(inner, placed);
        if rect.width == 0 {
            continue;
        }

        let color = parse_hex_color(&placed.track.color).unwrap_or(PAPER);
        let mut style = Style::default().fg(color);
        if Some(placed.original_index) == cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if Some(placed.original_index) == active {
            style = style.add_modifier(Modifier::REVERSED);
            if view.info.is_playing {
                style = style.add_modifier(Modifier::BOLD);
            }
        }

        let text: String = tag_text(&placed.track)
            .chars()
            .take(usize::from(rect.width))
            .collect();
        buf.set_string(rect.x, rect.y, text, style);
    }
}

fn draw_notice(frame: &mut Frame, inner: Rect, notice: &str) {
    if inner.height == 0 {
        return;
    }
    let area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(Clear, area);
    let banner = Paragraph::new(format!(
        "{notice} (check that the file exists under the media root)"
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::White).bg(DEVILS));
    frame.render_widget(banner, area);
}

/// Bottom-aligned bars in eighth-block steps.
pub struct SpectrumBars<'a> {
    pub bars: &'a [f32],
    pub color: Color,
}

impl Widget for SpectrumBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

        if self.bars.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }

        let count = self.bars.len() as u16;
        let slot = (area.width / count).max(1);
        let bar_width = if slot > 2 { slot - 1 } else { slot };
        let total_eighths = u32::from(area.height) * 8;

        for (i, v) in self.bars.iter().enumerate() {
            let x0 = area.x + i as u16 * slot;
            if x0 >= area.right() {
                break;
            }
            // Always show a sliver so silent bars stay visible.
            let level = ((v.clamp(0.0, 1.0) * total_eighths as f32).round() as u32).max(1);

            for row in 0..area.height {
                let y = area.bottom() - 1 - row;
                let filled = level.saturating_sub(u32::from(row) * 8).min(8) as usize;
                if filled == 0 {
                    break;
                }
                for x in x0..(x0 + bar_width).min(area.right()) {
                    buf[(x, y)].set_char(EIGHTHS[filled]).set_fg(self.color);
                }
            }
        }
    }
}

fn now_playing_line(view: &WallView) -> Line<'static> {
    let Some(track) = view.current else {
        return Line::from("—");
    };

    let icon = if view.info.is_playing { "▶ " } else { "❚❚ " };
    let mut spans = vec![
        Span::styled(icon, Style::default().fg(NEON)),
        Span::styled(track.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(album) = track.album.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        spans.push(Span::raw(format!(" — {album}")));
    }
    if view.info.is_muted {
        spans.push(Span::styled("  [muted]", Style::default().fg(SUNSET)));
    }
    Line::from(spans)
}

fn draw_player(frame: &mut Frame, area: Rect, view: &WallView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(now_playing_line(view)), rows[0]);

    let label = match view.info.phase {
        PlaybackPhase::Idle => "idle".to_string(),
        phase => format!("{} {:>3.0}%", phase.label(), view.info.progress * 100.0),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(NEON).bg(Color::Black))
        .ratio(view.info.progress.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, rows[1]);
}

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10).min(r.width);
    height = height.min(r.height.saturating_sub(2)).max(5).min(r.height);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn draw_intro(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect_sized(48, 7, area);
    frame.render_widget(Clear, popup);

    let title = app.header_text.trim();
    let text = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(NEON).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("press any key to enter"),
    ];
    let splash = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" enter "));
    frame.render_widget(splash, popup);
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, view: &WallView) {
    let chunks = layout_chunks(frame.area(), !view.bars.is_empty());

    let header = Paragraph::new(app.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tagwall ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks.header);

    let viewport = app.viewport.map_or("", |v| v.as_str());
    let wall_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" wall · {viewport} "));
    let inner = wall_block.inner(chunks.wall);
    frame.render_widget(wall_block, chunks.wall);

    if app.intro {
        draw_intro(frame, inner, app);
    } else if !app.has_tracks() {
        let empty = Paragraph::new("no tracks on the wall")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    } else {
        draw_wall(frame.buffer_mut(), inner, app, view);
    }

    if let Some(notice) = view.info.notice.as_deref() {
        draw_notice(frame, inner, notice);
    }

    if !view.bars.is_empty() {
        frame.render_widget(
            SpectrumBars {
                bars: view.bars,
                color: NEON,
            },
            chunks.bars,
        );
    }

    draw_player(frame, chunks.player, view);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks.footer);
}
