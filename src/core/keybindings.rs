//! Keybindings for text entry, menus and the channel picker.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use crate::core::input::matches_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    CursorLeft,
    CursorRight,
    CursorLineStart,
    CursorLineEnd,
    DeleteCharBackward,
    Submit,
    SelectUp,
    SelectDown,
    SelectConfirm,
    SelectCancel,
    ToggleChannel,
}

pub type KeyId = String;

#[derive(Debug, Clone)]
pub enum KeyBinding {
    Single(KeyId),
    Multiple(Vec<KeyId>),
}

impl From<&str> for KeyBinding {
    fn from(value: &str) -> Self {
        KeyBinding::Single(value.to_string())
    }
}

impl From<Vec<&str>> for KeyBinding {
    fn from(value: Vec<&str>) -> Self {
        KeyBinding::Multiple(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeybindingsConfig {
    entries: HashMap<EditorAction, KeyBinding>,
}

impl KeybindingsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<KeyBinding>>(&mut self, action: EditorAction, keys: K) {
        self.entries.insert(action, keys.into());
    }
}

pub static DEFAULT_KEYBINDINGS: LazyLock<HashMap<EditorAction, Vec<KeyId>>> =
    LazyLock::new(|| {
        use EditorAction::*;

        let mut map = HashMap::new();
        map.insert(CursorLeft, vec!["left".to_string(), "ctrl+b".to_string()]);
        map.insert(CursorRight, vec!["right".to_string(), "ctrl+f".to_string()]);
        map.insert(CursorLineStart, vec!["home".to_string(), "ctrl+a".to_string()]);
        map.insert(CursorLineEnd, vec!["end".to_string(), "ctrl+e".to_string()]);
        map.insert(DeleteCharBackward, vec!["backspace".to_string()]);
        map.insert(Submit, vec!["enter".to_string()]);
        map.insert(SelectUp, vec!["up".to_string()]);
        map.insert(SelectDown, vec!["down".to_string()]);
        map.insert(SelectConfirm, vec!["enter".to_string()]);
        map.insert(SelectCancel, vec!["escape".to_string(), "ctrl+c".to_string()]);
        map.insert(ToggleChannel, vec!["space".to_string(), "ctrl+t".to_string()]);
        map
    });

pub struct KeybindingsManager {
    action_to_keys: HashMap<EditorAction, Vec<KeyId>>,
}

impl KeybindingsManager {
    pub fn new(config: KeybindingsConfig) -> Self {
        let mut manager = Self {
            action_to_keys: HashMap::new(),
        };
        manager.build_maps(&config);
        manager
    }

    fn build_maps(&mut self, config: &KeybindingsConfig) {
        self.action_to_keys = DEFAULT_KEYBINDINGS.clone();

        for (action, binding) in &config.entries {
            let key_list = match binding {
                KeyBinding::Single(key) => vec![key.clone()],
                KeyBinding::Multiple(keys) => keys.clone(),
            };
            self.action_to_keys.insert(*action, key_list);
        }
    }

    pub fn matches(&self, data: &str, action: EditorAction) -> bool {
        self.action_to_keys
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|key| matches_key(data, key)))
    }

    pub fn get_keys(&self, action: EditorAction) -> Vec<KeyId> {
        self.action_to_keys.get(&action).cloned().unwrap_or_default()
    }

    pub fn set_config(&mut self, config: KeybindingsConfig) {
        self.build_maps(&config);
    }
}

/// Keybindings shared by every widget of one session.
pub type KeybindingsHandle = Arc<Mutex<KeybindingsManager>>;

pub fn default_keybindings_handle() -> KeybindingsHandle {
    Arc::new(Mutex::new(KeybindingsManager::new(KeybindingsConfig::default())))
}

pub(crate) fn lock_keybindings(handle: &KeybindingsHandle) -> MutexGuard<'_, KeybindingsManager> {
    crate::lock_unpoisoned(handle)
}
