//! Pieces module - tetromino shapes and SRS rotation
//!
//! Shapes are stored as four mino offsets from the piece origin for every
//! rotation state. Rotation tries the SRS wall kicks in order and takes the
//! first offset that fits. Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Shapes indexed by `[kind][rotation]`, rotation order N, E, S, W
const SHAPES: [[PieceShape; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

fn kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::I => 0,
        PieceKind::O => 1,
        PieceKind::T => 2,
        PieceKind::S => 3,
        PieceKind::Z => 4,
        PieceKind::J => 5,
        PieceKind::L => 6,
    }
}

fn rotation_index(rotation: Rotation) -> usize {
    rotation.index() as usize
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind_index(kind)][rotation_index(rotation)]
}

/// SRS wall kick data for clockwise turns, five (dx, dy) candidates per
/// starting rotation
pub type KickTable = [[(i8, i8); 5]; 4];

/// O piece never kicks
const O_KICKS: KickTable = [[(0, 0); 5]; 4];

/// Shared by J, L, S, T, Z
const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // N->E
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // E->S
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // S->W
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // W->N
];

const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // N->E
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // E->S
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // S->W
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // W->N
];

pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Result of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotated {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

/// Try to rotate a piece a quarter turn clockwise with wall kicks.
///
/// `is_free(x, y)` must report whether a board cell is in bounds and empty.
/// Returns the new rotation and origin, or `None` when every kick collides.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<Rotated> {
    let new_rotation = rotation.rotate_cw();
    let new_shape = get_shape(kind, new_rotation);
    let kicks = &get_kick_table(kind)[rotation_index(rotation)];

    kicks.iter().find_map(|&(dx, dy)| {
        let (nx, ny) = (x + dx, y + dy);
        new_shape
            .iter()
            .all(|&(mx, my)| is_free(nx + mx, ny + my))
            .then_some(Rotated {
                rotation: new_rotation,
                x: nx,
                y: ny,
            })
    })
}

/// Spawn position for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (crate::types::SPAWN_X, crate::types::SPAWN_Y);
