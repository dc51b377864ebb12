//! Menu window: a navigable list of entries, some of which carry input fields.

use crate::command::{CommandArg, DataType};
use crate::core::component::{Component, CursorPos};
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{lock_keybindings, EditorAction, KeybindingsHandle};
use crate::core::text::{truncate_to_width, visible_width};
use crate::core::text_buffer::TextBuffer;
use crate::widgets::input::{apply_edit_event, render_field};

/// One menu entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub info: String,
    pub is_input: bool,
    pub input_type: Option<DataType>,
    pub input: TextBuffer,
    pub is_category: bool,
    pub children: Vec<MenuItem>,
    /// Parameter this entry was generated from, if any.
    pub user_data: Option<CommandArg>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: info.into(),
            ..Self::default()
        }
    }

    /// Interactive entry bound to `arg`'s datatype.
    pub fn input_for(arg: &CommandArg) -> Self {
        Self {
            name: arg.name.clone(),
            info: arg.description.clone(),
            is_input: true,
            input_type: Some(arg.datatype),
            user_data: Some(arg.clone()),
            ..Self::default()
        }
    }

    pub fn category(name: impl Into<String>, info: impl Into<String>, children: Vec<MenuItem>) -> Self {
        Self {
            name: name.into(),
            info: info.into(),
            is_category: true,
            children,
            ..Self::default()
        }
    }
}

/// Menu collaborator consumed by windows built on top of a menu.
pub trait MenuWindow: Component {
    fn set_options(&mut self, items: Vec<MenuItem>);

    /// Top-level entries, in display order.
    fn options(&self) -> &[MenuItem];

    fn highlighted(&self) -> Option<&MenuItem>;

    /// Activates the highlighted entry using the menu's own selection logic.
    fn select(&mut self);

    /// Leaves the current category. Returns false at the top level.
    fn back(&mut self) -> bool;
}

/// Default [`MenuWindow`] with category drill-down and inline input fields.
pub struct MenuList {
    title: String,
    items: Vec<MenuItem>,
    path: Vec<usize>,
    selected_index: usize,
    max_visible: usize,
    keybindings: KeybindingsHandle,
    last_cursor_pos: Option<CursorPos>,
}

impl MenuList {
    pub fn new(title: impl Into<String>, keybindings: KeybindingsHandle) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            path: Vec::new(),
            selected_index: 0,
            max_visible: 10,
            keybindings,
            last_cursor_pos: None,
        }
    }

    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.max_visible = max_visible.max(1);
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Nesting depth; 0 at the top level.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn current_level(&self) -> &[MenuItem] {
        let mut level = self.items.as_slice();
        for &index in &self.path {
            match level.get(index) {
                Some(item) => level = &item.children,
                None => return &[],
            }
        }
        level
    }

    fn current_level_mut(&mut self) -> &mut [MenuItem] {
        let mut level = self.items.as_mut_slice();
        for &index in &self.path {
            if index >= level.len() {
                return &mut [];
            }
            level = &mut level[index].children;
        }
        level
    }

    fn highlighted_mut(&mut self) -> Option<&mut MenuItem> {
        let index = self.selected_index;
        self.current_level_mut().get_mut(index)
    }

    fn render_item(&self, item: &MenuItem, selected: bool, width: usize) -> (String, Option<usize>) {
        let prefix = if selected { "→ " } else { "  " };
        let budget = width.saturating_sub(visible_width(prefix));

        if item.is_input {
            let label = truncate_to_width(&format!("{}: ", item.name), budget / 2);
            let available = budget.saturating_sub(visible_width(&label));
            if available == 0 {
                return (format!("{prefix}{label}"), None);
            }
            let (field, col) = render_field(&item.input, available, selected);
            let cursor_col = selected.then_some(visible_width(prefix) + visible_width(&label) + col);
            return (format!("{prefix}{label}{field}"), cursor_col);
        }

        let marker = if item.is_category { " ›" } else { "" };
        let text = if item.info.is_empty() {
            format!("{}{marker}", item.name)
        } else {
            format!("{}{marker}  {}", item.name, item.info)
        };
        (format!("{prefix}{}", truncate_to_width(&text, budget)), None)
    }
}

impl MenuWindow for MenuList {
    fn set_options(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.path.clear();
        self.selected_index = 0;
    }

    fn options(&self) -> &[MenuItem] {
        &self.items
    }

    fn highlighted(&self) -> Option<&MenuItem> {
        self.current_level().get(self.selected_index)
    }

    fn select(&mut self) {
        let enter = self
            .highlighted()
            .is_some_and(|item| item.is_category && !item.children.is_empty());
        if enter {
            self.path.push(self.selected_index);
            self.selected_index = 0;
        }
    }

    fn back(&mut self) -> bool {
        match self.path.pop() {
            Some(index) => {
                self.selected_index = index;
                true
            }
            None => false,
        }
    }
}

impl Component for MenuList {
    fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = vec![truncate_to_width(&self.title, width)];
        self.last_cursor_pos = None;

        let level = self.current_level();
        if level.is_empty() {
            lines.push("  (empty)".to_string());
            return lines;
        }

        let max_visible = self.max_visible.min(level.len());
        let start = self
            .selected_index
            .saturating_sub(max_visible / 2)
            .min(level.len() - max_visible);
        let end = start + max_visible;

        let mut cursor = None;
        for (index, item) in level.iter().enumerate().take(end).skip(start) {
            let (line, col) = self.render_item(item, index == self.selected_index, width);
            if let Some(col) = col {
                cursor = Some(CursorPos {
                    row: lines.len(),
                    col,
                });
            }
            lines.push(line);
        }

        if start > 0 || end < level.len() {
            let scroll = format!("  ({}/{})", self.selected_index + 1, level.len());
            lines.push(truncate_to_width(&scroll, width));
        }

        self.last_cursor_pos = cursor;
        lines
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        self.last_cursor_pos
    }

    fn handle_event(&mut self, event: &InputEvent) {
        let keybindings = self.keybindings.clone();
        let kb = lock_keybindings(&keybindings);
        let len = self.current_level().len();

        if let InputEvent::Key { key_id, .. } = event {
            if kb.matches(key_id, EditorAction::SelectUp) {
                if len > 0 {
                    self.selected_index = if self.selected_index == 0 {
                        len - 1
                    } else {
                        self.selected_index - 1
                    };
                }
                return;
            }
            if kb.matches(key_id, EditorAction::SelectDown) {
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                }
                return;
            }
        }

        if let Some(item) = self.highlighted_mut() {
            if item.is_input {
                apply_edit_event(&mut item.input, event, &kb);
            }
        }
    }
}
