use crate::history::Snapshot;

/// The raw request text being edited, with a byte cursor into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pub text: String,
    pub cursor: usize,
    pub use_https: bool,
}

impl EditorState {
    /// Replace the contents, e.g. after selecting a request or moving
    /// through history. The cursor goes back to the top.
    pub fn load(&mut self, snapshot: &Snapshot) {
        self.text = snapshot.raw_text.clone();
        self.use_https = snapshot.use_https;
        self.cursor = 0;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.text.clone(), self.use_https)
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor.min(self.text.len());
        self.text.insert(cursor, c);
        self.cursor = cursor + c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(&self.text, self.cursor);
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let next = next_char_boundary(&self.text, self.cursor);
        self.text.drain(self.cursor..next);
    }

    pub fn move_left(&mut self) {
        self.cursor = prev_char_boundary(&self.text, self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = next_char_boundary(&self.text, self.cursor);
    }

    pub fn move_home(&mut self) {
        let before = &self.text[..self.cursor.min(self.text.len())];
        self.cursor = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    }

    pub fn move_end(&mut self) {
        let start = self.cursor.min(self.text.len());
        self.cursor = match self.text[start..].find('\n') {
            Some(i) => start + i,
            None => self.text.len(),
        };
    }

    pub fn move_up(&mut self) {
        let (row, col) = self.cursor_row_col();
        if row == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = offset_of(&self.text, row - 1, col);
    }

    pub fn move_down(&mut self) {
        let (row, col) = self.cursor_row_col();
        if row + 1 >= self.text.split('\n').count() {
            self.cursor = self.text.len();
            return;
        }
        self.cursor = offset_of(&self.text, row + 1, col);
    }

    /// Zero-based line and column (in chars) of the cursor.
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor.min(self.text.len())];
        let row = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        (row, before[line_start..].chars().count())
    }
}

/// Byte offset of `col` chars into line `row`, clamped to the line's end.
fn offset_of(text: &str, row: usize, col: usize) -> usize {
    let mut start = 0;
    for (i, line) in text.split('\n').enumerate() {
        if i == row {
            let col_bytes = line
                .char_indices()
                .nth(col)
                .map(|(b, _)| b)
                .unwrap_or(line.len());
            return start + col_bytes;
        }
        start += line.len() + 1;
    }
    text.len()
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = pos.min(text.len()) - 1;
    while p > 0 && !text.is_char_boundary(p) {
        p -= 1;
    }
    p
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut p = pos + 1;
    while p < text.len() && !text.is_char_boundary(p) {
        p += 1;
    }
    p
}
