/// Single-line command buffer with cursor and history.
#[derive(Debug, Default)]
pub(super) struct Input {
    pub(super) buf: String,
    pub(super) cursor: usize,
    history: Vec<String>,
    history_pos: Option<usize>,
}

impl Input {
    pub(super) fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
        self.history_pos = None;
    }

    pub(super) fn insert_char(&mut self, c: char) {
        self.buf.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub(super) fn backspace(&mut self) {
        let Some((idx, _)) = self.buf[..self.cursor].char_indices().next_back() else {
            return;
        };
        self.buf.remove(idx);
        self.cursor = idx;
    }

    pub(super) fn move_left(&mut self) {
        if let Some((idx, _)) = self.buf[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub(super) fn move_right(&mut self) {
        if let Some(c) = self.buf[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub(super) fn set(&mut self, s: String) {
        self.cursor = s.len();
        self.buf = s;
    }

    /// Record a submitted line, skipping blanks and immediate repeats.
    pub(super) fn push_history(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.history.last().is_some_and(|prev| prev == line) {
            self.history_pos = None;
            return;
        }
        self.history.push(line.to_string());
        self.history_pos = None;
    }

    pub(super) fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_pos {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_pos = Some(next);
        self.set(self.history[next].clone());
    }

    pub(super) fn history_down(&mut self) {
        let Some(i) = self.history_pos else {
            return;
        };
        if i + 1 >= self.history.len() {
            self.clear();
            return;
        }
        self.history_pos = Some(i + 1);
        self.set(self.history[i + 1].clone());
    }
}
