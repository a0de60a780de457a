//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `messages`: Message list and message body panels

pub mod input;
pub mod messages;
pub mod render;
pub mod styles;
