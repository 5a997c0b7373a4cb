//! Rendering.
//!
//! Maps the page onto terminal cells. Layout units (the ones the core and
//! the [`Surface`] use) convert to cells at [`CELL_WIDTH`] x
//! [`CELL_HEIGHT`]; the phone frame, track and handle keep their relative
//! sizes, so a drag measured in cells can be fed back as layout units.
//!
//! ```text
//! ┌──────────── terminal ─────────────┐
//! │          ╭── frame ──╮            │
//! │          │   9:41    │            │
//! │          │           │            │
//! │          │ ██▶slide… │ <- track   │
//! │          ╰───────────╯            │
//! └───────────────────────────────────┘
//! ```

use std::time::Instant;

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType},
};
use slidelock_app::{App, FrameSample, PageView, Section, SectionTracker, Surface, Theme};
use slidelock_core::{Extent, FrameStyle, View};

/// Layout units per terminal column.
pub const CELL_WIDTH: f64 = 10.0;

/// Layout units per terminal row.
pub const CELL_HEIGHT: f64 = 25.0;

/// Widest slide track, in layout units.
pub const TRACK_WIDTH: f64 = 270.0;

/// Destination header height, in layout units.
pub const HEADER_HEIGHT: f64 = 2.0 * CELL_HEIGHT;

/// Height of each destination section, in layout units.
pub const SECTION_HEIGHT: f64 = 12.0 * CELL_HEIGHT;

const HANDLE_CELLS: u16 = 6;
const SLIDE_LABEL: &str = "slide to answer";
const DOCK_HINT: &str = "[t] theme  [1-5] sections  [q] quit";

/// Section copy, one line per row.
fn section_body(section: Section) -> &'static [&'static str] {
    match section {
        Section::About => &["Engineer who likes state machines more than spinners."],
        Section::Skills => &["Rust  TypeScript  Distributed systems  Animation"],
        Section::Projects => &["slidelock: a lock screen that opens into a website"],
        Section::Leadership => &["Mentoring, design reviews, on-call that sleeps at night"],
        Section::Contact => &["hello@example.com"],
    }
}

/// Everything drawn besides animated values, captured at the last render.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Page state.
    pub view: PageView,
    /// Destination section layout and scroll position.
    pub sections: SectionTracker,
}

impl Scene {
    /// Snapshot `app` for drawing.
    pub fn capture(app: &App) -> Self {
        Self { view: app.view(), sections: app.sections().clone() }
    }
}

/// Screen regions input mapping needs from the last draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hints {
    /// Slide track.
    pub track: Option<Rect>,
    /// Handle, inside the track.
    pub handle: Option<Rect>,
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::Rgb(250, 250, 250),
                fg: Color::Rgb(20, 20, 20),
                muted: Color::Rgb(140, 140, 140),
                accent: Color::Rgb(0, 122, 255),
            },
            Theme::Dark => Self {
                bg: Color::Rgb(12, 12, 14),
                fg: Color::Rgb(235, 235, 235),
                muted: Color::Rgb(100, 100, 100),
                accent: Color::Rgb(10, 132, 255),
            },
        }
    }

    fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

fn faded(style: Style, opacity: f64) -> Style {
    if opacity < 0.6 { style.add_modifier(Modifier::DIM) } else { style }
}

/// Slide track width for a viewport `viewport_width` layout units wide.
///
/// The phone frame shrinks to the viewport; the track keeps one cell of
/// border and one of padding on each side.
pub fn track_width(viewport_width: f64) -> f64 {
    let frame = match FrameStyle::PHONE.extent {
        Extent::Fixed { width, .. } => width.min(viewport_width),
        Extent::Viewport => viewport_width,
    };
    let cells = (frame / CELL_WIDTH).floor() - 4.0;
    (cells * CELL_WIDTH).clamp(0.0, TRACK_WIDTH)
}

fn cells(units: f64, per_cell: f64, max: u16) -> u16 {
    let n = (units / per_cell).round();
    if n <= 0.0 { 0 } else { (n as u16).min(max) }
}

fn frame_rect(area: Rect, sample: &FrameSample) -> Rect {
    let width = cells(sample.width * sample.scale, CELL_WIDTH, area.width);
    let height = cells(sample.height * sample.scale, CELL_HEIGHT, area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y < area.y || y >= area.bottom() || x >= area.right() {
        return;
    }
    buf.set_stringn(x, y, text, usize::from(area.right() - x), style);
}

fn put_centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let x = area.x + area.width.saturating_sub(len) / 2;
    put(buf, area, x, y, text, style);
}

/// Draw the page; returns the regions input mapping needs.
pub fn draw(frame: &mut Frame<'_>, scene: &Scene, surface: &Surface, now: Instant) -> Hints {
    let palette = Palette::for_theme(scene.view.theme);
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let sample = surface.frame(now);
    let outer = frame_rect(area, &sample);
    let bordered = sample.border_width >= 0.5 && outer.width > 2 && outer.height > 2;
    let inner = if bordered { outer.inner(Margin::new(1, 1)) } else { outer };

    if bordered {
        let border_type = if sample.border_width > 10.0 {
            BorderType::Thick
        } else if sample.border_radius > 0.0 {
            BorderType::Rounded
        } else {
            BorderType::Plain
        };
        let block = Block::bordered()
            .border_type(border_type)
            .border_style(faded(palette.base(), sample.border_alpha))
            .style(palette.base());
        frame.render_widget(block, outer);
    }

    let buf = frame.buffer_mut();
    if surface.is_mounted(View::Destination) {
        draw_destination(buf, inner, scene, surface, now, palette);
    }
    if surface.is_mounted(View::LockScreen) {
        return draw_lock_screen(buf, inner, surface, now, palette);
    }
    Hints::default()
}

fn draw_lock_screen(
    buf: &mut Buffer,
    inner: Rect,
    surface: &Surface,
    now: Instant,
    palette: Palette,
) -> Hints {
    let opacity = surface.lock_screen_opacity(now);
    if opacity < 0.05 || inner.height < 3 {
        return Hints::default();
    }
    let base = faded(palette.base(), opacity);

    let clock_row = inner.y + inner.height / 4;
    put_centered(buf, inner, clock_row, "9:41", base.add_modifier(Modifier::BOLD));
    put_centered(buf, inner, clock_row + 1, "Incoming call", base.fg(palette.muted));

    let track_cells = cells(track_width(surface.viewport().0), CELL_WIDTH, inner.width);
    if track_cells == 0 {
        return Hints::default();
    }
    let track = Rect {
        x: inner.x + (inner.width - track_cells) / 2,
        y: inner.bottom().saturating_sub(2),
        width: track_cells,
        height: 1,
    };
    put(buf, inner, track.x, track.y, &"░".repeat(usize::from(track.width)), base.fg(palette.muted));

    let label_opacity = surface.label_opacity();
    if label_opacity > 0.2 {
        put_centered(buf, track, track.y, SLIDE_LABEL, faded(base, label_opacity));
    }

    let offset = cells(surface.handle_x(now), CELL_WIDTH, track.width);
    let width = HANDLE_CELLS.min(track.width);
    let handle = Rect {
        x: (track.x + offset).min(track.right() - width),
        y: track.y,
        width,
        height: 1,
    };
    let mut handle_style = base.fg(palette.accent);
    if surface.handle_pressed() {
        handle_style = handle_style.add_modifier(Modifier::REVERSED);
    }
    put(buf, inner, handle.x, handle.y, &"█".repeat(usize::from(handle.width)), handle_style);

    Hints { track: Some(track), handle: Some(handle) }
}

fn draw_destination(
    buf: &mut Buffer,
    inner: Rect,
    scene: &Scene,
    surface: &Surface,
    now: Instant,
    palette: Palette,
) {
    if surface.overlay_opacity(now) > 0.5 {
        let shade = Style::default().bg(palette.muted);
        for y in inner.top()..inner.bottom() {
            put(buf, inner, inner.x, y, &" ".repeat(usize::from(inner.width)), shade);
        }
    }

    let (opacity, scale) = surface.reveal(now);
    if opacity < 0.05 || inner.height < 2 {
        return;
    }
    let inset = cells(f64::from(inner.width) * (1.0 - scale) / 2.0, 1.0, inner.width / 2);
    let area = Rect { x: inner.x + inset, width: inner.width - 2 * inset, ..inner };
    let base = faded(palette.base(), opacity);
    let view = &scene.view;

    // Header
    let mut x = area.x + 1;
    for section in Section::ALL {
        let style = if section == view.active_section {
            base.fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            base
        };
        put(buf, area, x, area.y, section.id(), style);
        x = x.saturating_add(u16::try_from(section.id().len()).unwrap_or(0) + 2);
    }
    let mark = match view.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let mark_x = area.right().saturating_sub(u16::try_from(mark.len()).unwrap_or(0) + 1);
    put(buf, area, mark_x, area.y, mark, base.fg(palette.muted));

    let dock_rows = if view.dock_visible { 2 } else { 0 };
    let header_rows = cells(HEADER_HEIGHT, CELL_HEIGHT, area.height);
    let content = Rect {
        y: area.y + header_rows,
        height: area.height.saturating_sub(header_rows + dock_rows),
        ..area
    };
    let scroll_top = scene.sections.scroll_top();
    for layout in scene.sections.layout() {
        let row = (layout.top - scroll_top) / CELL_HEIGHT;
        if row < 0.0 {
            continue;
        }
        let y = area.y.saturating_add(row.round() as u16);
        let title = layout.section.id().to_uppercase();
        put(buf, content, content.x + 1, y, &title, base.add_modifier(Modifier::BOLD));
        for (i, line) in section_body(layout.section).iter().enumerate() {
            let line_y = y.saturating_add(u16::try_from(i + 1).unwrap_or(u16::MAX));
            put(buf, content, content.x + 3, line_y, line, base);
        }
        if layout.section == Section::Projects {
            if let Some(project) = &view.focused_project {
                let line_y = y.saturating_add(2);
                put(buf, content, content.x + 3, line_y, &format!("> {project}"), base.fg(palette.accent));
            }
        }
    }

    if view.dock_visible {
        let y = if view.dock_raised { area.bottom() - 2 } else { area.bottom() - 1 };
        put_centered(buf, area, y, DOCK_HINT, base.fg(palette.muted));
    }
}
