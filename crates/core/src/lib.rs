//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the game state that the device exposes. It has **zero
//! dependencies** on files, locks or the device model, which keeps it:
//!
//! - **Deterministic**: the same seed and command sequence give the same game
//! - **Testable**: every rule is reachable through [`GameState::apply_command`]
//! - **Bounded**: the board is a fixed array, renders are O(board size)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of settled cells, collision checks and row clearing
//! - [`game_state`]: active piece, next piece, score, game-over flag, command handling
//! - [`pieces`]: tetromino shapes and SRS rotation with wall kicks
//! - [`rng`]: 7-bag random piece generation
//! - [`scoring`]: line clear points
//! - [`snapshot`]: copy of the visible fields taken under the device lock
//! - [`render`]: board, device frame and status report text
//!
//! # Example
//!
//! ```
//! use tetris_chardev_core::GameState;
//! use tetris_chardev_types::Command;
//!
//! let mut game = GameState::new(12345);
//! assert!(game.active().is_some());
//!
//! game.apply_command(Command::MoveRight);
//! game.apply_command(Command::RotateCw);
//! game.apply_command(Command::HardDrop);
//!
//! let board = game.render_board();
//! assert_eq!(board.lines().count(), 20);
//! assert_eq!(game.score(), 0); // only line clears score
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod render;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_chardev_types as types;

pub use board::{Board, Grid};
pub use game_state::{GameState, Tetromino};
pub use pieces::{get_shape, try_rotate};
pub use render::{BoardView, DeviceFrame, RenderStyle, StatusReport};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::line_clear_score;
pub use snapshot::{ActiveSnapshot, GameSnapshot};
