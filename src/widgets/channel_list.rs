//! Channel picker used to toggle which channels are listened to.

use crate::chat::listening::{ListeningChannels, Toggled};
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{lock_keybindings, EditorAction, KeybindingsHandle};
use crate::core::text::truncate_to_width;

/// What the caller should do after a channel list event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelListOutcome {
    None,
    Toggled { channel_id: String, toggled: Toggled },
    Close,
}

/// Vertical list of channels with the listened ones marked.
///
/// Takes the listening set by reference on every call rather than owning it.
pub struct ChannelList {
    header: String,
    channels: Vec<String>,
    selected_index: usize,
    keybindings: KeybindingsHandle,
}

impl ChannelList {
    pub fn new(channels: Vec<String>, keybindings: KeybindingsHandle) -> Self {
        Self {
            header: "Select an item".to_string(),
            channels,
            selected_index: 0,
            keybindings,
        }
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    pub fn set_channels(&mut self, channels: Vec<String>) {
        self.channels = channels;
        self.selected_index = self.selected_index.min(self.channels.len().saturating_sub(1));
    }

    pub fn selected(&self) -> Option<&str> {
        self.channels.get(self.selected_index).map(String::as_str)
    }

    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        listening: &mut ListeningChannels,
    ) -> ChannelListOutcome {
        let key = match event {
            InputEvent::Key { key_id, .. } => key_id.as_str(),
            InputEvent::Text { text, .. } if text == " " => " ",
            _ => return ChannelListOutcome::None,
        };

        let (up, down, toggle, cancel) = {
            let kb = lock_keybindings(&self.keybindings);
            (
                kb.matches(key, EditorAction::SelectUp),
                kb.matches(key, EditorAction::SelectDown),
                kb.matches(key, EditorAction::ToggleChannel)
                    || kb.matches(key, EditorAction::SelectConfirm),
                kb.matches(key, EditorAction::SelectCancel),
            )
        };

        if up {
            self.selected_index = self.selected_index.saturating_sub(1);
        } else if down {
            if self.selected_index + 1 < self.channels.len() {
                self.selected_index += 1;
            }
        } else if toggle {
            if let Some(channel_id) = self.selected().map(str::to_string) {
                let toggled = listening.toggle(&channel_id);
                return ChannelListOutcome::Toggled { channel_id, toggled };
            }
        } else if cancel {
            return ChannelListOutcome::Close;
        }
        ChannelListOutcome::None
    }

    pub fn render(&self, width: usize, listening: &ListeningChannels) -> Vec<String> {
        let mut lines = vec![truncate_to_width(&self.header, width)];
        for (index, channel) in self.channels.iter().enumerate() {
            let pointer = if index == self.selected_index { '>' } else { ' ' };
            let mark = if listening.contains(channel) { '*' } else { ' ' };
            lines.push(truncate_to_width(&format!("{pointer}{mark} {channel}"), width));
        }
        lines
    }
}
