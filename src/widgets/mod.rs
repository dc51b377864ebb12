//! Interactive widgets built on the core editing primitives.

pub mod channel_list;
pub mod input;
pub mod menu;

pub use channel_list::{ChannelList, ChannelListOutcome};
pub use input::TextInput;
pub use menu::{MenuItem, MenuList, MenuWindow};
