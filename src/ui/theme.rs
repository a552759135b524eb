use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Chrome
    pub title_style: Style,
    pub pane_border_style: Style,
    pub pane_title_style: Style,
    pub hint_style: Style,
    pub notice_style: Style,
    pub loading_indicator_style: Style,

    // Notes editor
    pub input_border_locked_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub placeholder_style: Style,

    // Results
    pub heading_style: Style,
    pub body_style: Style,
    pub success_style: Style,
    pub failure_style: Style,
    pub disclaimer_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,

            title_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            pane_border_style: Style::default().fg(Color::Gray),
            pane_title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            hint_style: Style::default().fg(Color::DarkGray),
            notice_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            loading_indicator_style: Style::default().fg(Color::LightBlue),

            input_border_locked_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().fg(Color::DarkGray),

            heading_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body_style: Style::default().fg(Color::White),
            success_style: Style::default().fg(Color::Green),
            failure_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            disclaimer_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,

            title_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            pane_border_style: Style::default().fg(Color::Gray),
            pane_title_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            hint_style: Style::default().fg(Color::DarkGray),
            notice_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            loading_indicator_style: Style::default().fg(Color::Blue),

            input_border_locked_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().fg(Color::Gray),

            heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            body_style: Style::default().fg(Color::Black),
            success_style: Style::default().fg(Color::Green),
            failure_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            disclaimer_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}
