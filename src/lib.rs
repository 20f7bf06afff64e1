//! Tetris as a character device (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tetris_chardev::{core,device,input,types}` and holds
//! the pieces shared by the two binaries.

pub use tetris_chardev_core as core;
pub use tetris_chardev_device as device;
pub use tetris_chardev_input as input;
pub use tetris_chardev_types as types;

pub mod probe;
pub mod screen;
