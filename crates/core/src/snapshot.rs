//! Point-in-time copy of the externally visible game fields.
//!
//! Taken under the device lock and formatted after it is released, so a
//! snapshot always describes one consistent state.

use serde::{Serialize, Serializer};

use crate::board::Grid;
use crate::game_state::Tetromino;
use crate::types::{PieceKind, Rotation, CELL_EMPTY, CELL_FILLED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: PieceKind,
    #[serde(serialize_with = "serialize_rotation")]
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameSnapshot {
    pub score: u32,
    pub lines: u32,
    pub game_over: bool,
    #[serde(serialize_with = "serialize_kind")]
    pub next_piece: PieceKind,
    pub current_piece: Option<ActiveSnapshot>,
    /// Settled cells with the active piece overlaid, row 0 at the top
    #[serde(serialize_with = "serialize_grid")]
    pub board: Grid,
}

fn serialize_kind<S: Serializer>(kind: &PieceKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.as_str())
}

fn serialize_rotation<S: Serializer>(rotation: &Rotation, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(rotation.as_str())
}

/// Rows as glyph strings, the same text the board render uses
fn serialize_grid<S: Serializer>(grid: &Grid, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(grid.iter().map(|row| {
        row.iter()
            .map(|&cell| if cell { CELL_FILLED } else { CELL_EMPTY })
            .collect::<String>()
    }))
}
