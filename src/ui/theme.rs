use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Transcript
    pub user_text_style: Style,
    pub bot_text_style: Style,

    // Chrome
    pub panel_border_style: Style,
    pub title_style: Style,
    pub toggle_button_style: Style,
    pub busy_indicator_style: Style,
    pub input_border_style: Style,
    pub input_text_style: Style,
    pub disabled_input_style: Style,

    // Notifications
    pub info_style: Style,
    pub warning_style: Style,
    pub error_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_text_style: Style::default().fg(Color::Cyan),
            bot_text_style: Style::default().fg(Color::White),

            panel_border_style: Style::default().fg(Color::Gray),
            title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            toggle_button_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            busy_indicator_style: Style::default().fg(Color::Yellow),
            input_border_style: Style::default().fg(Color::Blue),
            input_text_style: Style::default().fg(Color::White),
            disabled_input_style: Style::default().fg(Color::DarkGray),

            info_style: Style::default().fg(Color::Black).bg(Color::Cyan),
            warning_style: Style::default().fg(Color::Black).bg(Color::Yellow),
            error_style: Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    /// Everything unstyled, for output that is not a color terminal.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        Theme {
            user_text_style: plain,
            bot_text_style: plain,
            panel_border_style: plain,
            title_style: plain.add_modifier(Modifier::BOLD),
            toggle_button_style: plain.add_modifier(Modifier::REVERSED),
            busy_indicator_style: plain,
            input_border_style: plain,
            input_text_style: plain,
            disabled_input_style: plain.add_modifier(Modifier::DIM),
            info_style: plain.add_modifier(Modifier::REVERSED),
            warning_style: plain.add_modifier(Modifier::REVERSED),
            error_style: plain.add_modifier(Modifier::REVERSED | Modifier::BOLD),
        }
    }
}
