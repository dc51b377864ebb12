//! Codepoint-addressed text buffer backing every input field.

/// Editable single-line text with a cursor measured in codepoints.
///
/// Invariant: `cursor <= len()` and every edit lands on a `char` boundary, so
/// multi-byte characters are never split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `content` with the cursor at its end.
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.chars().count();
        Self { content, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the content, clamping the cursor to the new length.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.cursor.min(self.len());
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Returns the content and leaves the buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.len();
    }

    /// Inserts `ch` before the codepoint under the cursor and advances past it.
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Inserts text one codepoint at a time, skipping line breaks.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|ch| !matches!(ch, '\r' | '\n')) {
            self.insert_char(ch);
        }
    }

    /// Removes the codepoint immediately before the cursor.
    ///
    /// No-op at the start of the buffer. Returns the removed character.
    pub fn delete_backward(&mut self) -> Option<char> {
        if self.cursor == 0 || self.content.is_empty() {
            return None;
        }
        let start = self.byte_offset(self.cursor - 1);
        let removed = self.content[start..].chars().next()?;
        self.content.replace_range(start..start + removed.len_utf8(), "");
        self.cursor -= 1;
        Some(removed)
    }

    /// Content split around the cursor.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.byte_offset(self.cursor))
    }

    fn byte_offset(&self, codepoint: usize) -> usize {
        self.content
            .char_indices()
            .nth(codepoint)
            .map_or(self.content.len(), |(index, _)| index)
    }
}
