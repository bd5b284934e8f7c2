//! Key and mouse handling for the chat widget.
//!
//! Handlers only touch widget state. Anything that needs the runtime, such as
//! sending a turn or quitting, comes back as a [`KeyAction`] for the event
//! loop to carry out.

use crate::core::turn::PendingTurn;
use crate::core::widget::ChatWidget;
use crate::ui::renderer::RenderMetrics;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use tracing::debug;

const WHEEL_LINES: u16 = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Send(PendingTurn),
    Quit,
}

pub fn handle_key(widget: &mut ChatWidget, key: KeyEvent, metrics: &RenderMetrics) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Char('o') if ctrl => {
            widget.panel.toggle();
            return KeyAction::Continue;
        }
        _ => {}
    }

    if !widget.panel.is_open() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            widget.panel.open();
        }
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Esc => widget.panel.close(),
        KeyCode::Char('l') if ctrl => toggle_transcript(widget),
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            widget.edit_input(|input| input.push('\n'));
        }
        KeyCode::Enter => {
            if widget.is_busy() {
                debug!("enter ignored while a turn is in flight");
                return KeyAction::Continue;
            }
            if let Ok(turn) = widget.begin_pending_turn() {
                return KeyAction::Send(turn);
            }
        }
        KeyCode::Backspace => {
            widget.edit_input(|input| {
                input.pop();
            });
        }
        KeyCode::Char(ch) if !ctrl => {
            widget.edit_input(|input| input.push(ch));
        }
        KeyCode::Up => widget.auto_scroll.scroll_up(1),
        KeyCode::Down => widget.auto_scroll.scroll_down(1, metrics.max_offset),
        KeyCode::PageUp => widget.auto_scroll.scroll_up(page(metrics)),
        KeyCode::PageDown => widget
            .auto_scroll
            .scroll_down(page(metrics), metrics.max_offset),
        _ => {}
    }
    KeyAction::Continue
}

pub fn handle_mouse(widget: &mut ChatWidget, mouse: MouseEvent, metrics: &RenderMetrics) {
    let position = Position::new(mouse.column, mouse.row);
    let inside = |area: Option<Rect>| area.is_some_and(|rect| rect.contains(position));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside(metrics.button_area) => {
            widget.panel.open();
        }
        MouseEventKind::ScrollUp if inside(metrics.panel_area) => {
            widget.auto_scroll.scroll_up(WHEEL_LINES);
        }
        MouseEventKind::ScrollDown if inside(metrics.panel_area) => {
            widget
                .auto_scroll
                .scroll_down(WHEEL_LINES, metrics.max_offset);
        }
        _ => {}
    }
}

fn page(metrics: &RenderMetrics) -> u16 {
    metrics.viewport_height.saturating_sub(1).max(1)
}

fn toggle_transcript(widget: &mut ChatWidget) {
    match widget.transcript_mut().toggle() {
        Ok(status) => widget.notifications_mut().info(status),
        Err(reason) => widget.notifications_mut().warning(reason),
    }
}
