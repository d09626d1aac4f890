mod shared;
mod table;
mod theme;
mod viewport;

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

pub use shared::{clip_chars, rule, truncate_str};
pub use table::{
    Column, Table, CONTAINER_COLUMNS, IMAGE_COLUMNS, NETWORK_COLUMNS, VOLUME_COLUMNS,
};
pub use theme::{Style, Theme};
pub use viewport::Viewport;

/// One styled line of a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

impl Line {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style }
    }

    pub fn blank() -> Self {
        Self::new("", Style::plain())
    }
}

/// A fully computed screen. Built by the renderer, painted by [`Presenter`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, lines: Vec::new() }
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        self.lines.push(Line::new(text, style));
    }

    pub fn push_blank(&mut self) {
        self.lines.push(Line::blank());
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}

pub struct Presenter;

impl Presenter {
    /// Paint a frame. Lines beyond the terminal height are dropped and every
    /// line is clipped to the terminal width.
    pub fn draw(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
        queue!(out, Clear(ClearType::All))?;
        let width = frame.width as usize;

        for (y, line) in frame.lines.iter().take(frame.height as usize).enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            if let Some(fg) = line.style.fg {
                queue!(out, SetForegroundColor(fg))?;
            }
            if let Some(bg) = line.style.bg {
                queue!(out, SetBackgroundColor(bg))?;
            }
            if line.style.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            queue!(out, Print(clip_chars(&line.text, width)))?;
            queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
        }

        out.flush()
    }
}
