use crossterm::style::Color;

/// Colors and attributes for one line of output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self { fg: None, bg: None, bold: false }
    }

    pub const fn fg(color: Color) -> Self {
        Self { fg: Some(color), bg: None, bold: false }
    }

    pub const fn on(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Styling for every region of the screen. Passed to the renderer explicitly,
/// never looked up from global state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub header: Style,
    pub rule: Style,
    pub footer: Style,
    pub status: Style,
    pub table_header: Style,
    pub table_selected: Style,
    pub body: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Style::fg(Color::AnsiValue(240)).bold(),
            rule: Style::fg(Color::AnsiValue(240)),
            footer: Style::fg(Color::AnsiValue(240)),
            status: Style::fg(Color::AnsiValue(170)),
            table_header: Style::plain().bold(),
            table_selected: Style::fg(Color::AnsiValue(229)).on(Color::AnsiValue(57)),
            body: Style::plain(),
            error: Style::fg(Color::Red).bold(),
        }
    }
}

impl Theme {
    /// Theme without colors, for dumb terminals and snapshot-style tests.
    pub fn monochrome() -> Self {
        Self {
            header: Style::plain().bold(),
            rule: Style::plain(),
            footer: Style::plain(),
            status: Style::plain(),
            table_header: Style::plain().bold(),
            table_selected: Style::plain().bold(),
            body: Style::plain(),
            error: Style::plain().bold(),
        }
    }
}
