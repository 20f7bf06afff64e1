//! Game state module - the complete state behind the device
//!
//! Ties together the board, piece shapes, the 7-bag queue and scoring.
//! Every mutation goes through [`GameState::apply_command`]; the state has no
//! knowledge of files, locks or rendering targets.

use crate::board::Grid;
use crate::pieces::{get_shape, try_rotate, PieceShape};
use crate::render::BoardView;
use crate::scoring::line_clear_score;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X, SPAWN_Y};
use crate::{Board, PieceQueue};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered by the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if all minos are on empty, in-bounds cells
    pub fn fits(&self, board: &Board) -> bool {
        self.cells().iter().all(|&(x, y)| board.is_valid(x, y))
    }

    fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Complete game state
///
/// Play advances only through [`GameState::apply_command`]; the movement and
/// spawn steps behind it are private.
///
/// ```compile_fail
/// let mut game = tetris_chardev_core::GameState::new(1);
/// game.try_move(0, -1);
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Tetromino>,
    next: PieceKind,
    queue: PieceQueue,
    score: u32,
    lines: u32,
    game_over: bool,
}

impl GameState {
    /// Create a game on an empty board with the first piece already spawned
    pub fn new(seed: u32) -> Self {
        Self::with_board(seed, Board::new())
    }

    /// Create a game on a prepared board.
    ///
    /// The first piece spawns immediately, so a board that blocks the spawn
    /// area yields a game that is already over.
    pub fn with_board(seed: u32, board: Board) -> Self {
        let mut queue = PieceQueue::new(seed);
        let next = queue.draw();
        let mut state = Self {
            board,
            active: None,
            next,
            queue,
            score: 0,
            lines: 0,
            game_over: false,
        };
        state.spawn_piece();
        state
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    /// Apply one command. Returns whether anything changed.
    ///
    /// Once the game is over only [`Command::Restart`] has an effect.
    pub fn apply_command(&mut self, command: Command) -> bool {
        if self.game_over && command != Command::Restart {
            return false;
        }

        match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::SoftDrop => self.soft_drop(),
            Command::RotateCw => self.try_rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Move the active piece if the target cells are free
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.shifted(dx, dy);
        if !moved.fits(&self.board) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Rotate the active piece with SRS wall kicks
    fn try_rotate(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        if active.kind == PieceKind::O {
            return false;
        }

        let board = &self.board;
        let Some(rotated) = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            |x, y| board.is_valid(x, y),
        ) else {
            return false;
        };

        self.active = Some(Tetromino {
            rotation: rotated.rotation,
            x: rotated.x,
            y: rotated.y,
            ..active
        });
        true
    }

    /// Move down one row; a piece that cannot move settles instead
    fn soft_drop(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        if !self.try_move(0, 1) {
            self.settle();
        }
        true
    }

    /// Drop the active piece as far as it goes and settle it
    fn hard_drop(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        while self.try_move(0, 1) {}
        self.settle();
        true
    }

    /// Write the active piece into the board, clear rows, score, spawn the next piece
    fn settle(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let locked = self.board.lock_piece(&active.shape(), active.x, active.y);
        debug_assert!(locked, "active piece overlaps the board");

        let cleared = self.board.clear_full_rows().len();
        if cleared > 0 {
            self.lines += cleared as u32;
            self.score = self.score.saturating_add(line_clear_score(cleared));
        }

        self.spawn_piece();
    }

    /// Spawn `next` at the spawn position.
    ///
    /// Sets `game_over` (and leaves no active piece) when the spawn cells are taken.
    fn spawn_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let piece = Tetromino::new(self.next);
        if !piece.fits(&self.board) {
            self.active = None;
            self.game_over = true;
            return false;
        }

        self.active = Some(piece);
        self.next = self.queue.draw();
        true
    }

    /// Fresh board and score; the piece queue keeps running
    fn restart(&mut self) {
        self.board.clear();
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.game_over = false;
        self.spawn_piece();
    }

    /// Settled cells with the active piece overlaid
    pub fn visible_grid(&self) -> Grid {
        let mut grid = [[false; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.board.write_grid(&mut grid);
        if let Some(active) = self.active {
            for (x, y) in active.cells() {
                if let Some(cell) = grid
                    .get_mut(y as usize)
                    .and_then(|row| row.get_mut(x as usize))
                {
                    *cell = true;
                }
            }
        }
        grid
    }

    /// Render the 20x10 board as `#`/`.` rows, one line per row
    pub fn render_board(&self) -> String {
        BoardView(&self.visible_grid()).to_string()
    }

    /// Copy every externally visible field into a snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            lines: self.lines,
            game_over: self.game_over,
            next_piece: self.next,
            current_piece: self.active.map(ActiveSnapshot::from),
            board: self.visible_grid(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotatable(seed: u32) -> GameState {
        let mut seed = seed;
        loop {
            let state = GameState::new(seed);
            if state.active.map(|p| p.kind) != Some(PieceKind::O) {
                return state;
            }
            seed = seed.wrapping_add(1);
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        let active = state.active.expect("first piece spawns on construction");
        assert_eq!((active.x, active.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(active.rotation, Rotation::North);
    }

    #[test]
    fn test_spawn_takes_next_piece() {
        let mut state = GameState::new(12345);
        let next = state.next;

        assert!(state.apply_command(Command::HardDrop));
        assert_eq!(state.active.unwrap().kind, next);
    }

    #[test]
    fn test_try_move_walls() {
        let mut state = GameState::new(12345);

        let mut moved = 0;
        for _ in 0..10 {
            if state.try_move(-1, 0) {
                moved += 1;
            }
        }
        assert!(moved <= SPAWN_X as i32 + 1);
        assert!(!state.try_move(-1, 0));
        assert!(!state.try_move(0, -1));
    }

    #[test]
    fn test_rotate_cw_four_times_returns_to_north() {
        let mut state = rotatable(12345);
        // Drop a few rows so kicks have room.
        for _ in 0..4 {
            state.try_move(0, 1);
        }
        for _ in 0..4 {
            assert!(state.apply_command(Command::RotateCw));
        }
        assert_eq!(state.active.unwrap().rotation, Rotation::North);
    }

    #[test]
    fn test_o_piece_does_not_rotate() {
        let mut seed = 1;
        let mut state = GameState::new(seed);
        while state.active.unwrap().kind != PieceKind::O {
            seed += 1;
            state = GameState::new(seed);
        }
        let before = state.active;
        assert!(!state.apply_command(Command::RotateCw));
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_soft_drop_settles_when_blocked() {
        let mut state = GameState::new(12345);
        while state.try_move(0, 1) {}

        let occupied_before = state.board.occupied_count();
        assert!(state.apply_command(Command::SoftDrop));
        assert_eq!(state.board.occupied_count(), occupied_before + 4);
        assert_eq!(state.active.unwrap().y, SPAWN_Y);
    }

    #[test]
    fn test_hard_drop_lands_on_floor() {
        let mut state = GameState::new(12345);
        assert!(state.apply_command(Command::HardDrop));

        let bottom = BOARD_HEIGHT as usize - 1;
        let bottom_row = &state.board.cells()
            [bottom * BOARD_WIDTH as usize..(bottom + 1) * BOARD_WIDTH as usize];
        assert!(bottom_row.iter().any(|&c| c));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_single_line_clear_scores_100() {
        // Bottom row full except the four cells an I piece lying flat at x=3 covers.
        let prepared = || {
            let mut board = Board::new();
            board.fill_row_except(19, &[3, 4, 5, 6]);
            board
        };

        let mut seed = 1;
        let mut state = GameState::with_board(seed, prepared());
        while state.active.unwrap().kind != PieceKind::I {
            seed += 1;
            state = GameState::with_board(seed, prepared());
        }

        assert!(state.apply_command(Command::HardDrop));
        assert_eq!(state.score, 100);
        assert_eq!(state.lines, 1);
        assert!(!state.board.is_row_full(19));
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, 0, true);
            board.set(x, 1, true);
        }
        let mut state = GameState::with_board(5, board);

        assert!(state.game_over);
        assert!(state.active.is_none());
        for cmd in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::RotateCw,
            Command::HardDrop,
        ] {
            assert!(!state.apply_command(cmd));
        }

        assert!(state.apply_command(Command::Restart));
        assert!(!state.game_over);
        assert!(state.active.is_some());
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_render_board_overlays_active_piece() {
        let state = GameState::new(12345);
        let rendered = state.render_board();
        assert_eq!(rendered.matches('#').count(), 4);
        assert_eq!(rendered.lines().count(), BOARD_HEIGHT as usize);
    }

    #[test]
    fn test_snapshot_matches_accessors() {
        let mut state = GameState::new(4242);
        state.apply_command(Command::MoveRight);
        let snap = state.snapshot();

        assert_eq!(snap.score, state.score());
        assert_eq!(snap.game_over, state.game_over());
        assert_eq!(snap.next_piece, state.next_piece());
        assert_eq!(snap.current_piece, state.active().map(ActiveSnapshot::from));
        assert_eq!(snap.board, state.visible_grid());
    }
}
