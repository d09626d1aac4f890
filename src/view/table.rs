use std::ops::Range;

use crossterm::event::KeyCode;

use super::shared::truncate_str;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(title: &'static str, width: usize) -> Self {
        Self { title, width }
    }
}

pub const CONTAINER_COLUMNS: [Column; 7] = [
    Column::new("ID", 12),
    Column::new("Image", 20),
    Column::new("Command", 30),
    Column::new("Created", 15),
    Column::new("Status", 20),
    Column::new("Ports", 20),
    Column::new("Names", 20),
];

pub const IMAGE_COLUMNS: [Column; 5] = [
    Column::new("ID", 15),
    Column::new("Repository", 30),
    Column::new("Tag", 15),
    Column::new("Size", 10),
    Column::new("Created", 20),
];

pub const VOLUME_COLUMNS: [Column; 4] = [
    Column::new("Name", 30),
    Column::new("Driver", 15),
    Column::new("Scope", 10),
    Column::new("Mountpoint", 50),
];

pub const NETWORK_COLUMNS: [Column; 4] = [
    Column::new("ID", 15),
    Column::new("Name", 30),
    Column::new("Driver", 15),
    Column::new("Scope", 10),
];

/// Rows of one resource kind plus a cursor.
#[derive(Clone, Debug)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    cursor: usize,
    height: usize, // visible rows, used as the page size
}

impl Table {
    pub fn new(columns: &[Column]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
            cursor: 0,
            height: 0,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Replace every row. The cursor stays put unless it would point past the end.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    pub fn selected_row(&self) -> Option<&[String]> {
        self.rows.get(self.cursor).map(Vec::as_slice)
    }

    /// First cell of the selected row: the id or name the actions operate on.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_row()
            .and_then(|row| row.first())
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let last = self.rows.len().saturating_sub(1);
        self.cursor = (self.cursor + n).min(last);
    }

    pub fn goto_top(&mut self) {
        self.cursor = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    /// Cursor movement keys. Returns true if the key was used.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let page = self.height.max(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::PageUp => self.move_up(page),
            KeyCode::PageDown => self.move_down(page),
            KeyCode::Home | KeyCode::Char('g') => self.goto_top(),
            KeyCode::End | KeyCode::Char('G') => self.goto_bottom(),
            _ => return false,
        }
        true
    }

    /// Rows to draw in `capacity` lines, scrolled so the cursor is visible.
    pub fn window(&self, capacity: usize) -> Range<usize> {
        if capacity == 0 || self.rows.is_empty() {
            return 0..0;
        }
        let start = if self.cursor < capacity { 0 } else { self.cursor + 1 - capacity };
        start..(start + capacity).min(self.rows.len())
    }

    pub fn format_header(&self) -> String {
        let titles: Vec<String> = self.columns.iter().map(|c| c.title.to_string()).collect();
        self.format_cells(&titles)
    }

    pub fn format_row(&self, index: usize) -> String {
        self.rows.get(index).map(|row| self.format_cells(row)).unwrap_or_default()
    }

    /// Total width of all columns including separators.
    pub fn total_width(&self) -> usize {
        let cols: usize = self.columns.iter().map(|c| c.width).sum();
        cols + self.columns.len().saturating_sub(1)
    }

    fn format_cells(&self, cells: &[String]) -> String {
        let parts: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let cell = cell.replace(['\n', '\r', '\t'], " ");
                format!("{:<width$}", truncate_str(&cell, col.width), width = col.width)
            })
            .collect();
        parts.join(" ").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Vec<String>> {
        (0..n).map(|i| vec![format!("id{}", i), format!("name{}", i)]).collect()
    }

    fn table(n: usize) -> Table {
        let mut t = Table::new(&NETWORK_COLUMNS);
        t.set_rows(rows(n));
        t.set_height(3);
        t
    }

    #[test]
    fn empty_table_has_no_selection() {
        let t = Table::new(&CONTAINER_COLUMNS);
        assert!(t.selected_row().is_none());
        assert!(t.selected_id().is_none());
        assert_eq!(t.window(10), 0..0);
    }

    #[test]
    fn cursor_clamped_when_rows_shrink() {
        let mut t = table(10);
        t.goto_bottom();
        assert_eq!(t.cursor(), 9);
        t.set_rows(rows(4));
        assert_eq!(t.cursor(), 3);
        assert_eq!(t.selected_id(), Some("id3"));
        t.set_rows(vec![]);
        assert_eq!(t.cursor(), 0);
    }

    #[test]
    fn keys_move_cursor_within_bounds() {
        let mut t = table(10);
        assert!(t.handle_key(KeyCode::Down));
        assert!(t.handle_key(KeyCode::Char('j')));
        assert_eq!(t.cursor(), 2);
        assert!(t.handle_key(KeyCode::PageDown));
        assert_eq!(t.cursor(), 5);
        assert!(t.handle_key(KeyCode::End));
        assert_eq!(t.cursor(), 9);
        assert!(t.handle_key(KeyCode::Down));
        assert_eq!(t.cursor(), 9);
        assert!(t.handle_key(KeyCode::Home));
        assert_eq!(t.cursor(), 0);
        assert!(t.handle_key(KeyCode::Up));
        assert_eq!(t.cursor(), 0);
        assert!(!t.handle_key(KeyCode::Char('s')));
    }

    #[test]
    fn window_follows_cursor() {
        let mut t = table(10);
        assert_eq!(t.window(3), 0..3);
        t.move_down(5);
        assert_eq!(t.window(3), 3..6);
        t.goto_bottom();
        assert_eq!(t.window(3), 7..10);
        assert_eq!(t.window(0), 0..0);
    }

    #[test]
    fn cells_are_padded_and_truncated() {
        let mut t = Table::new(&[Column::new("ID", 4), Column::new("Name", 6)]);
        t.set_rows(vec![vec!["abcdefgh".into(), "web".into()]]);
        assert_eq!(t.format_header(), "ID   Name");
        assert_eq!(t.format_row(0), "a... web");
        assert_eq!(t.format_row(5), "");
        assert_eq!(t.total_width(), 11);
    }
}
