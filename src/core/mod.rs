//! Core interfaces and editing primitives.

pub mod component;
pub mod input;
pub mod input_event;
pub mod keybindings;
pub mod text;
pub mod text_buffer;
