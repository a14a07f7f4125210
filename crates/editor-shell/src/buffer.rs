//! Rope-backed text buffer.
//!
//! Holds the live content of the active file while it is being edited. The
//! rope gives O(log N) insertion and deletion and cheap char/line conversion,
//! which is what the cursor read-out and the tab-insertion edit are built on.

use ropey::Rope;

/// Live edit buffer for one open file.
///
/// Offsets are character offsets throughout; multi-byte characters count as
/// one column like any other.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from existing text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Get the complete text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total line count (a trailing newline opens one more line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Insert text at the given character offset (clamped to the end).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete `len_chars` characters starting at `start_char` (clamped).
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = (start_char + len_chars).min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// 1-based line and column of a character offset.
    ///
    /// The line is the newline count before the offset plus one; the column
    /// counts characters since the last newline plus one. Offsets past the
    /// end are clamped.
    pub fn cursor_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        (line_idx + 1, char_offset - line_start_char + 1)
    }

    /// Replace the `start..end` selection with four literal spaces and
    /// return the caret offset after the inserted indent.
    ///
    /// A collapsed selection (`start == end`) is a plain insertion. Both
    /// offsets are clamped into the buffer and `end` is never allowed to
    /// precede `start`.
    pub fn insert_tab(&mut self, start: usize, end: usize) -> usize {
        let start = start.min(self.rope.len_chars());
        let end = end.clamp(start, self.rope.len_chars());

        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, "    ");
        start + 4
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
