//! Terminal chat client core.
//!
//! # Public API Overview
//! - Keep per-channel message history synchronized with a [`ChatService`] via
//!   [`ListeningChannels`] and [`HistorySync`].
//! - Collect typed command arguments interactively with [`CommandExecWindow`].
//! - Edit single-line text with [`TextBuffer`] and [`TextInput`].
//! - Bundle all of it per process in a [`Session`].

use std::sync::{Mutex, MutexGuard};

pub mod config;
pub mod error;
pub mod logging;

pub mod chat;
pub mod command;
pub mod core;
pub mod session;
pub mod widgets;

pub use chat_service::{ChannelId, ChatService, ChatServiceError, FetchRequest, Message, MessageId};

/// History reconciliation and the listening set.
pub use crate::chat::{merge_history, ChannelStore, HistorySync, ListeningChannels, Toggled};

/// Command model and the argument collection window.
pub use crate::command::{
    coerce, ArgValue, Arguments, Command, CommandArg, CommandDispatcher, CommandExecWindow,
    CommandRegistry, DataType, ExecState,
};

pub use crate::config::EnvConfig;
pub use crate::error::Error;
pub use crate::logging::{init_logging, LogGuard, LogMirror};
pub use crate::session::Session;

/// Runtime component traits.
pub use crate::core::component::{Component, CursorPos, Focusable};
pub use crate::core::input_event::{parse_input_events, InputEvent};
/// Keybinding configuration and default mappings.
pub use crate::core::keybindings::{
    default_keybindings_handle, EditorAction, KeybindingsConfig, KeybindingsHandle,
    KeybindingsManager, DEFAULT_KEYBINDINGS,
};
pub use crate::core::text_buffer::TextBuffer;

/// Built-in widgets.
pub use crate::widgets::{
    ChannelList, ChannelListOutcome, MenuItem, MenuList, MenuWindow, TextInput,
};

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
