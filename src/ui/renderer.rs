use crate::core::constants::{NARROW_TERMINAL_WIDTH, PANEL_WIDTH};
use crate::core::notification::NotificationLevel;
use crate::core::widget::ChatWidget;
use crate::ui::theme::Theme;
use crate::utils::scroll::ScrollCalculator;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const BUTTON_LABEL: &str = " Chat ";
const BUTTON_MARGIN: u16 = 1;
const INPUT_HEIGHT: u16 = 3;

/// Geometry from the last frame, used by the event loop to map keys and
/// mouse clicks onto the widget.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderMetrics {
    pub button_area: Option<Rect>,
    pub panel_area: Option<Rect>,
    pub viewport_height: u16,
    pub max_offset: u16,
}

/// Where the side panel sits for a terminal of the given size: docked right,
/// fixed width on wide terminals and 90% of the width on narrow ones.
pub fn panel_area(area: Rect) -> Rect {
    let width = if area.width > NARROW_TERMINAL_WIDTH {
        PANEL_WIDTH.min(area.width)
    } else {
        (area.width as u32 * 90 / 100) as u16
    }
    .max(1)
    .min(area.width);
    Rect::new(
        area.x + area.width.saturating_sub(width),
        area.y,
        width,
        area.height,
    )
}

/// The toggle button, anchored to the bottom-right corner.
pub fn button_area(area: Rect) -> Rect {
    let width = (BUTTON_LABEL.width() as u16 + 2).min(area.width);
    let height = 3.min(area.height);
    let x = area.x + area.width.saturating_sub(width + BUTTON_MARGIN);
    let y = area.y + area.height.saturating_sub(height + BUTTON_MARGIN);
    Rect::new(x, y, width, height)
}

pub fn ui(f: &mut Frame, widget: &mut ChatWidget, theme: &Theme) -> RenderMetrics {
    let area = f.area();

    let hint = if widget.panel.is_open() {
        format!(
            "Esc close • Ctrl+L transcript log: {} • Ctrl+C quit",
            widget.transcript().status_string()
        )
    } else {
        "Ctrl+O or click Chat to open • Ctrl+C quit".to_string()
    };
    f.render_widget(
        Paragraph::new(Line::from(hint)).style(theme.disabled_input_style),
        Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1.min(area.height)),
    );

    if !widget.panel.is_open() {
        let button = button_area(area);
        let tooltip = format!("Open {}", widget.title);
        f.render_widget(
            Paragraph::new(BUTTON_LABEL)
                .style(theme.toggle_button_style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(tooltip)),
            button,
        );
        render_notification(f, widget, theme, area);
        return RenderMetrics {
            button_area: Some(button),
            ..RenderMetrics::default()
        };
    }

    let panel = panel_area(area);
    f.render_widget(Clear, panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style)
        .title(Span::styled(format!(" {} ", widget.title), theme.title_style))
        .title_bottom(Line::from(" Esc ✕ ").right_aligned());
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let notice_height = u16::from(widget.notifications().current().is_some());
    let chunks = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(notice_height),
        Constraint::Length(INPUT_HEIGHT),
    ])
    .split(inner);

    // Transcript
    let lines = ScrollCalculator::build_display_lines(widget.conversation(), theme, chunks[0].width);
    let max_offset = ScrollCalculator::calculate_max_scroll_offset(lines.len(), chunks[0].height);
    widget.auto_scroll.settle(max_offset);
    f.render_widget(
        Paragraph::new(lines).scroll((widget.auto_scroll.offset(), 0)),
        chunks[0],
    );

    render_notification(f, widget, theme, chunks[1]);
    render_input(f, widget, theme, chunks[2]);

    RenderMetrics {
        button_area: None,
        panel_area: Some(panel),
        viewport_height: chunks[0].height,
        max_offset,
    }
}

fn render_notification(f: &mut Frame, widget: &ChatWidget, theme: &Theme, area: Rect) {
    let Some(notice) = widget.notifications().current() else {
        return;
    };
    if area.height == 0 {
        return;
    }
    let style = match notice.level {
        NotificationLevel::Info => theme.info_style,
        NotificationLevel::Warning => theme.warning_style,
        NotificationLevel::Error => theme.error_style,
    };
    let text = format!(" {} ", notice.text);
    let width = (text.width() as u16).min(area.width);
    let row = Rect::new(area.x + (area.width - width) / 2, area.y, width, 1);
    f.render_widget(Paragraph::new(text).style(style), row);
}

fn render_input(f: &mut Frame, widget: &ChatWidget, theme: &Theme, area: Rect) {
    let busy = widget.is_busy();
    let (title, style) = if busy {
        (" Sending... ", theme.disabled_input_style)
    } else {
        (" Message ⏎ ", theme.input_text_style)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if busy {
            theme.busy_indicator_style
        } else {
            theme.input_border_style
        })
        .title(title);
    let inner = block.inner(area);

    let visible = visible_tail(widget.input(), inner.width.saturating_sub(1) as usize);
    f.render_widget(Paragraph::new(visible.clone()).style(style).block(block), area);

    if !busy && inner.width > 0 && inner.height > 0 {
        let cursor_x = inner.x + (visible.width() as u16).min(inner.width - 1);
        f.set_cursor_position((cursor_x, inner.y));
    }
}

/// The end of `text` that fits in `width` columns, newlines shown as spaces.
fn visible_tail(text: &str, width: usize) -> String {
    let flattened: String = text.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();
    if flattened.width() <= width {
        return flattened;
    }
    let mut taken = 0usize;
    let mut tail: Vec<char> = Vec::new();
    for ch in flattened.chars().rev() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if taken + w > width {
            break;
        }
        taken += w;
        tail.push(ch);
    }
    tail.into_iter().rev().collect()
}
