//! Input handling.
//!
//! Translates crossterm events into [`AppEvent`]s. Keys map one to one; a
//! mouse drag is tracked from the press on the handle to the release so
//! its travel can be reported in layout units.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;
use slidelock_app::{AppEvent, Section, Theme};
use slidelock_core::InputEvent;

use crate::ui::{CELL_HEIGHT, CELL_WIDTH, Hints};

/// Wheel delta for one notch or arrow key, in layout units.
pub const WHEEL_STEP: f64 = 40.0;

/// Wheel notches per page key.
const PAGE_NOTCHES: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    origin_col: u16,
    handle_start: f64,
}

impl Drag {
    fn travel(&self, col: u16) -> f64 {
        (f64::from(col) - f64::from(self.origin_col)) * CELL_WIDTH
    }
}

/// Pointer state between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mouse: bool,
    drag: Option<Drag>,
}

impl InputState {
    /// Input state; mouse events are dropped unless `mouse` is set.
    pub fn new(mouse: bool) -> Self {
        Self { mouse, drag: None }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Map one terminal event.
    ///
    /// `hints` are the regions of the last draw and `handle_x` the handle
    /// offset at the time of the event.
    pub fn map(&mut self, event: &Event, hints: &Hints, handle_x: f64) -> Vec<AppEvent> {
        match event {
            Event::Key(key) => map_key(key).into_iter().collect(),
            Event::Mouse(mouse) if self.mouse => self.map_mouse(mouse, hints, handle_x),
            Event::Resize(cols, rows) => vec![AppEvent::Resize {
                width: f64::from(*cols) * CELL_WIDTH,
                height: f64::from(*rows) * CELL_HEIGHT,
            }],
            _ => Vec::new(),
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent, hints: &Hints, handle_x: f64) -> Vec<AppEvent> {
        let at = Position { x: mouse.column, y: mouse.row };
        let input = match mouse.kind {
            MouseEventKind::ScrollDown => InputEvent::Wheel { delta_y: WHEEL_STEP },
            MouseEventKind::ScrollUp => InputEvent::Wheel { delta_y: -WHEEL_STEP },
            MouseEventKind::Down(MouseButton::Left) => {
                if !hints.handle.is_some_and(|h| h.contains(at)) {
                    return Vec::new();
                }
                self.drag = Some(Drag { origin_col: mouse.column, handle_start: handle_x });
                InputEvent::DragStart
            },
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.drag else {
                    return Vec::new();
                };
                InputEvent::DragMove { x: drag.handle_start + drag.travel(mouse.column) }
            },
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return Vec::new();
                };
                InputEvent::DragEnd { offset: drag.travel(mouse.column) }
            },
            _ => return Vec::new(),
        };
        vec![AppEvent::Input(input)]
    }
}

/// Map a key press.
pub fn map_key(key: &KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(AppEvent::Quit);
    }
    let wheel = |delta_y: f64| Some(AppEvent::Input(InputEvent::Wheel { delta_y }));
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
        KeyCode::Char('t') => Some(AppEvent::ToggleTheme),
        KeyCode::Char('l') => Some(AppEvent::SetTheme(Theme::Light)),
        KeyCode::Char('d') => Some(AppEvent::SetTheme(Theme::Dark)),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c.to_digit(10).and_then(|d| usize::try_from(d).ok())?;
            Section::ALL.get(index - 1).copied().map(AppEvent::JumpToSection)
        },
        KeyCode::Down | KeyCode::Char('j') => wheel(WHEEL_STEP),
        KeyCode::Up | KeyCode::Char('k') => wheel(-WHEEL_STEP),
        KeyCode::PageDown => wheel(WHEEL_STEP * PAGE_NOTCHES),
        KeyCode::PageUp => wheel(-WHEEL_STEP * PAGE_NOTCHES),
        _ => None,
    }
}
