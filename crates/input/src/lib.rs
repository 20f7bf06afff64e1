//! Terminal input for the interactive harness.
//!
//! Maps `crossterm` key events to [`crate::types::Command`] and to the byte
//! the device expects for it. Independent of any rendering.

pub mod map;

pub use tetris_chardev_types as types;

pub use map::{key_to_byte, key_to_command, should_quit};
