//! Channel history synchronization.

pub mod history;
pub mod listening;

pub use history::{merge_history, ChannelStore, HistorySync, SharedChannelCache};
pub use listening::{ListeningChannels, Toggled};
