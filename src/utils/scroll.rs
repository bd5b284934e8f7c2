use crate::core::conversation::Conversation;
use crate::core::message::MessageEntry;
use crate::ui::theme::Theme;
use ratatui::layout::Alignment;
use ratatui::text::Line;
use unicode_width::UnicodeWidthChar;

/// Share of the panel width a single message may occupy.
const BUBBLE_WIDTH_PERCENT: usize = 80;

/// Handles all scroll-related calculations and line building
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Word-wrap `text` to `width` display columns. Explicit newlines are kept
    /// and tokens longer than the width are broken across lines.
    pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
        let width = width.max(1);
        let mut out = Vec::new();

        for raw_line in text.split('\n') {
            let mut current = String::new();
            let mut current_width = 0usize;
            // Leading spaces are kept as indentation until the line first wraps.
            let mut unwrapped = true;

            for (index, word) in raw_line.split(' ').enumerate() {
                let word_width: usize = word.chars().map(char_width).sum();

                if index > 0 {
                    if current_width > 0 && current_width + 1 + word_width > width {
                        out.push(std::mem::take(&mut current));
                        current_width = 0;
                        unwrapped = false;
                    } else if current_width > 0 || unwrapped {
                        current.push(' ');
                        current_width += 1;
                    }
                }

                for ch in word.chars() {
                    let w = char_width(ch);
                    if current_width > 0 && current_width + w > width {
                        out.push(std::mem::take(&mut current));
                        current_width = 0;
                        unwrapped = false;
                    }
                    current.push(ch);
                    current_width += w;
                }
            }

            out.push(current);
        }

        out
    }

    /// Width available to one message inside a panel of `panel_width` columns.
    pub fn bubble_width(panel_width: u16) -> usize {
        (panel_width as usize * BUBBLE_WIDTH_PERCENT / 100).max(1)
    }

    /// Lay out the conversation for a panel `panel_width` columns wide. Each
    /// entry is followed by an empty spacer line. User entries hug the right
    /// edge, bot entries the left.
    pub fn build_display_lines(
        conversation: &Conversation,
        theme: &Theme,
        panel_width: u16,
    ) -> Vec<Line<'static>> {
        let bubble = Self::bubble_width(panel_width);
        let mut lines = Vec::new();
        for entry in conversation.iter() {
            lines.extend(Self::entry_lines(entry, theme, bubble));
            lines.push(Line::from(""));
        }
        lines
    }

    fn entry_lines(entry: &MessageEntry, theme: &Theme, bubble: usize) -> Vec<Line<'static>> {
        let (style, alignment) = if entry.is_user() {
            (theme.user_text_style, Alignment::Right)
        } else {
            (theme.bot_text_style, Alignment::Left)
        };
        Self::wrap_text(&entry.text, bubble)
            .into_iter()
            .map(|text| Line::styled(text, style).alignment(alignment))
            .collect()
    }

    /// Offset that puts the last line at the bottom of a viewport of
    /// `available_height` rows.
    pub fn calculate_max_scroll_offset(total_lines: usize, available_height: u16) -> u16 {
        let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
        total.saturating_sub(available_height)
    }
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Keeps the newest entry in view.
///
/// `observe` notices conversation changes; the next `settle` aims the
/// viewport at the bottom, and `tick` eases the offset toward that target one
/// frame at a time. Scrolling by hand jumps immediately.
#[derive(Debug, Default, Clone)]
pub struct AutoScroll {
    seen_revision: u64,
    pending: bool,
    offset: u16,
    target: u16,
    fired: u64,
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once for every change in the conversation.
    pub fn observe(&mut self, conversation: &Conversation) -> bool {
        let revision = conversation.revision();
        if revision == self.seen_revision {
            return false;
        }
        self.seen_revision = revision;
        self.pending = true;
        self.fired += 1;
        true
    }

    /// Apply the layout's bottom offset. Retargets only after a fire; always
    /// keeps the offset within bounds when the layout shrinks.
    pub fn settle(&mut self, max_offset: u16) {
        if self.pending {
            self.target = max_offset;
            self.pending = false;
        }
        self.target = self.target.min(max_offset);
        self.offset = self.offset.min(max_offset);
    }

    /// Move one easing step toward the target. Returns true while moving.
    pub fn tick(&mut self) -> bool {
        if self.offset == self.target {
            return false;
        }
        let distance = self.offset.abs_diff(self.target);
        let step = (distance / 3).max(1);
        if self.offset < self.target {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        true
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.offset = self.offset.saturating_sub(lines);
        self.target = self.offset;
    }

    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        self.offset = self.offset.saturating_add(lines).min(max_offset);
        self.target = self.offset;
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn target(&self) -> u16 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.pending || self.offset != self.target
    }

    /// How many times `observe` has fired.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}
