//! Free-form text entry widget.

use crate::core::component::{Component, CursorPos, Focusable};
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{lock_keybindings, EditorAction, KeybindingsHandle, KeybindingsManager};
use crate::core::text::{char_width, visible_width};
use crate::core::text_buffer::TextBuffer;

/// Applies an editing event to `buffer`. Returns whether the event was consumed.
pub(crate) fn apply_edit_event(
    buffer: &mut TextBuffer,
    event: &InputEvent,
    keybindings: &KeybindingsManager,
) -> bool {
    match event {
        InputEvent::Text { text, .. } | InputEvent::Paste { text, .. } => {
            buffer.insert_str(text);
            true
        }
        InputEvent::Key { key_id, .. } => {
            if keybindings.matches(key_id, EditorAction::DeleteCharBackward) {
                buffer.delete_backward();
            } else if keybindings.matches(key_id, EditorAction::CursorLeft) {
                buffer.move_left();
            } else if keybindings.matches(key_id, EditorAction::CursorRight) {
                buffer.move_right();
            } else if keybindings.matches(key_id, EditorAction::CursorLineStart) {
                buffer.move_to_start();
            } else if keybindings.matches(key_id, EditorAction::CursorLineEnd) {
                buffer.move_to_end();
            } else {
                return false;
            }
            true
        }
        InputEvent::UnknownRaw { .. } => false,
    }
}

/// Renders `buffer` into exactly `available` columns.
///
/// Scrolls horizontally so the cursor cell stays visible. Returns the line and
/// the cursor column within it.
pub(crate) fn render_field(buffer: &TextBuffer, available: usize, show_cursor: bool) -> (String, usize) {
    let chars: Vec<char> = buffer.as_str().chars().collect();
    let cursor = buffer.cursor().min(chars.len());
    let cursor_cell = chars.get(cursor).map_or(1, |ch| char_width(*ch).max(1));
    let span_width = |span: &[char]| span.iter().map(|ch| char_width(*ch)).sum::<usize>();

    let mut start = 0;
    while start < cursor && span_width(&chars[start..cursor]) + cursor_cell > available {
        start += 1;
    }

    let before: String = chars[start..cursor].iter().collect();
    let at = chars.get(cursor).copied().unwrap_or(' ');
    let mut used = span_width(&chars[start..cursor]) + cursor_cell;
    let mut after = String::new();
    for &ch in chars.iter().skip(cursor + 1) {
        let w = char_width(ch);
        if used + w > available {
            break;
        }
        after.push(ch);
        used += w;
    }

    let col = visible_width(&before);
    let padding = " ".repeat(available.saturating_sub(used));
    let line = if show_cursor {
        format!("{before}\x1b[7m{at}\x1b[27m{after}{padding}")
    } else {
        format!("{before}{at}{after}{padding}")
    };
    (line, col)
}

/// Single-line input used for composing chat messages.
pub struct TextInput {
    buffer: TextBuffer,
    focused: bool,
    last_cursor_pos: Option<CursorPos>,
    prompt: String,
    keybindings: KeybindingsHandle,
    on_submit: Option<Box<dyn FnMut(String)>>,
}

impl TextInput {
    pub fn new(keybindings: KeybindingsHandle) -> Self {
        Self {
            buffer: TextBuffer::new(),
            focused: false,
            last_cursor_pos: None,
            prompt: "> ".to_string(),
            keybindings,
            on_submit: None,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn get_value(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.buffer.set_content(value);
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Handler receiving the composed text on submit. Empty input is not submitted.
    pub fn set_on_submit(&mut self, handler: Option<Box<dyn FnMut(String)>>) {
        self.on_submit = handler;
    }
}

impl Component for TextInput {
    fn render(&mut self, width: usize) -> Vec<String> {
        let prompt_width = visible_width(&self.prompt);
        let available = width.saturating_sub(prompt_width);
        if available == 0 {
            self.last_cursor_pos = None;
            return vec![self.prompt.clone()];
        }

        let (field, col) = render_field(&self.buffer, available, self.focused);
        self.last_cursor_pos = self.focused.then_some(CursorPos {
            row: 0,
            col: prompt_width + col,
        });
        vec![format!("{}{field}", self.prompt)]
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        self.last_cursor_pos
    }

    fn handle_event(&mut self, event: &InputEvent) {
        let submitted = {
            let kb = lock_keybindings(&self.keybindings);
            match event {
                InputEvent::Key { key_id, .. } if kb.matches(key_id, EditorAction::Submit) => true,
                _ => {
                    apply_edit_event(&mut self.buffer, event, &kb);
                    false
                }
            }
        };

        if submitted && !self.buffer.is_empty() {
            let text = self.buffer.take();
            if let Some(handler) = self.on_submit.as_mut() {
                handler(text);
            }
        }
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Focusable for TextInput {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}
