//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used by the game core and the
//! device layer. All types are pure data with no external dependencies.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn position**: (3, 0) for every piece
//!
//! # Command Vocabulary
//!
//! The input device interprets the first byte of every write:
//!
//! | Byte | Command | ioctl |
//! |------|---------|-------|
//! | `a` / `A` | [`Command::MoveLeft`] | `0x8000` |
//! | `d` / `D` | [`Command::MoveRight`] | `0x8001` |
//! | `s` / `S` | [`Command::SoftDrop`] | `0x8002` |
//! | `w` / `W` | [`Command::RotateCw`] | `0x8003` |
//! | space | [`Command::HardDrop`] | `0x8004` |
//! | `r` / `R` | [`Command::Restart`] | `0x8005` |
//!
//! Any other byte is ignored by the device.
//!
//! # Scoring
//!
//! Rows cleared by one settle score 100 / 300 / 500 / 800 for 1 / 2 / 3 / 4
//! rows. Nothing else scores.
//!
//! # Examples
//!
//! ```
//! use tetris_chardev_types::{Command, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! assert_eq!(Command::from_byte(b'w'), Some(Command::RotateCw));
//! assert_eq!(Command::from_byte(b'x'), None);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn position (x, y) of the piece origin
pub const SPAWN_X: i8 = 3;
pub const SPAWN_Y: i8 = 0;

/// Line clear scores indexed by rows cleared in a single settle
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Glyph for an occupied cell in the plain board render
pub const CELL_FILLED: char = '#';

/// Glyph for an empty cell in the plain board render
pub const CELL_EMPTY: char = '.';

/// ioctl command codes accepted by the input device
pub const IOCTL_LEFT: u32 = 0x8000;
pub const IOCTL_RIGHT: u32 = 0x8001;
pub const IOCTL_DOWN: u32 = 0x8002;
pub const IOCTL_ROTATE: u32 = 0x8003;
pub const IOCTL_DROP: u32 = 0x8004;
pub const IOCTL_RESET: u32 = 0x8005;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_chardev_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Upper-case letter used in the diagnostic output
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_chardev_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Quarter turns clockwise from north, 0..=3
    ///
    /// ```
    /// use tetris_chardev_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.index(), 0);
    /// assert_eq!(Rotation::West.index(), 3);
    /// ```
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands accepted by the game through the input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    HardDrop,
    Restart,
}

impl Command {
    /// Every command, in ioctl code order
    pub const ALL: [Command; 6] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::RotateCw,
        Command::HardDrop,
        Command::Restart,
    ];

    /// Decode a command byte written to the device.
    ///
    /// Returns `None` for bytes outside the vocabulary; the device ignores
    /// those.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'a' | b'A' => Some(Command::MoveLeft),
            b'd' | b'D' => Some(Command::MoveRight),
            b's' | b'S' => Some(Command::SoftDrop),
            b'w' | b'W' => Some(Command::RotateCw),
            b' ' => Some(Command::HardDrop),
            b'r' | b'R' => Some(Command::Restart),
            _ => None,
        }
    }

    /// Canonical byte for this command (lower-case form)
    pub fn as_byte(&self) -> u8 {
        match self {
            Command::MoveLeft => b'a',
            Command::MoveRight => b'd',
            Command::SoftDrop => b's',
            Command::RotateCw => b'w',
            Command::HardDrop => b' ',
            Command::Restart => b'r',
        }
    }

    /// Decode an ioctl command code
    pub fn from_ioctl(cmd: u32) -> Option<Self> {
        match cmd {
            IOCTL_LEFT => Some(Command::MoveLeft),
            IOCTL_RIGHT => Some(Command::MoveRight),
            IOCTL_DOWN => Some(Command::SoftDrop),
            IOCTL_ROTATE => Some(Command::RotateCw),
            IOCTL_DROP => Some(Command::HardDrop),
            IOCTL_RESET => Some(Command::Restart),
            _ => None,
        }
    }

    pub fn ioctl_code(&self) -> u32 {
        match self {
            Command::MoveLeft => IOCTL_LEFT,
            Command::MoveRight => IOCTL_RIGHT,
            Command::SoftDrop => IOCTL_DOWN,
            Command::RotateCw => IOCTL_ROTATE,
            Command::HardDrop => IOCTL_DROP,
            Command::Restart => IOCTL_RESET,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::RotateCw => "rotateCw",
            Command::HardDrop => "hardDrop",
            Command::Restart => "restart",
        }
    }
}
