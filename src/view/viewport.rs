use crossterm::event::KeyCode;

/// A scrollable text pane. `offset` is the index of the top visible line.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    lines: Vec<String>,
    offset: usize,
    width: usize,
    height: usize,
}

impl Viewport {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the content. The scroll offset is kept (clamped to the new length).
    pub fn set_content(&mut self, content: &str) {
        self.lines = content.lines().map(str::to_string).collect();
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.offset = 0;
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll keys. Returns true if the key was used.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let page = self.height.max(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageUp | KeyCode::Char('b') => self.scroll_up(page),
            KeyCode::PageDown | KeyCode::Char(' ') | KeyCode::Char('f') => self.scroll_down(page),
            KeyCode::Home | KeyCode::Char('g') => self.goto_top(),
            KeyCode::End | KeyCode::Char('G') => self.goto_bottom(),
            _ => return false,
        }
        true
    }

    /// Lines visible in `capacity` rows starting at the current offset.
    pub fn visible(&self, capacity: usize) -> &[String] {
        let start = self.offset.min(self.lines.len());
        let end = (start + capacity).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Percentage of the content scrolled past, for the pane footer.
    pub fn scroll_percent(&self) -> usize {
        let max = self.max_offset();
        if max == 0 { 100 } else { self.offset * 100 / max }
    }
}
