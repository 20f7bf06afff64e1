//! Text renderings of the game.
//!
//! Three views, all implemented as `Display` wrappers so they can be written
//! straight into a per-open buffer:
//!
//! - [`BoardView`]: the bare 20x10 `#`/`.` grid
//! - [`DeviceFrame`]: what one read cycle of the input device returns
//! - [`StatusReport`]: the labeled fields served by the diagnostic file

use std::fmt::{self, Write as _};

use crate::board::Grid;
use crate::snapshot::GameSnapshot;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, CELL_EMPTY, CELL_FILLED};

/// Bytes in a plain board render (each row plus its newline)
pub const PLAIN_BOARD_LEN: usize = (BOARD_WIDTH as usize + 1) * BOARD_HEIGHT as usize;

/// Layout used by the input device frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// `#`/`.` grid followed by `score:` and `game_over:` lines
    #[default]
    Plain,
    /// Box-drawing border, two columns per cell, `Score:` footer
    Boxed,
}

impl RenderStyle {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(RenderStyle::Plain),
            "boxed" => Some(RenderStyle::Boxed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStyle::Plain => "plain",
            RenderStyle::Boxed => "boxed",
        }
    }
}

/// The bare board, one line per row
pub struct BoardView<'a>(pub &'a Grid);

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0 {
            for &cell in row {
                f.write_char(if cell { CELL_FILLED } else { CELL_EMPTY })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Content of one input-device read cycle
pub struct DeviceFrame<'a> {
    pub snapshot: &'a GameSnapshot,
    pub style: RenderStyle,
}

impl fmt::Display for DeviceFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.snapshot;
        match self.style {
            RenderStyle::Plain => {
                write!(f, "{}", BoardView(&snap.board))?;
                writeln!(f, "score: {}", snap.score)?;
                writeln!(f, "game_over: {}", snap.game_over)
            }
            RenderStyle::Boxed => {
                let rule = "═".repeat(BOARD_WIDTH as usize * 2);
                writeln!(f, "╔{}╗", rule)?;
                for row in &snap.board {
                    f.write_char('║')?;
                    for &cell in row {
                        f.write_str(if cell { "██" } else { "  " })?;
                    }
                    writeln!(f, "║")?;
                }
                writeln!(f, "╚{}╝", rule)?;
                writeln!(f, "Score: {}", snap.score)?;
                if snap.game_over {
                    writeln!(f, "GAME OVER!")?;
                }
                Ok(())
            }
        }
    }
}

/// Labeled fields for out-of-band inspection
pub struct StatusReport<'a>(pub &'a GameSnapshot);

impl fmt::Display for StatusReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.0;
        writeln!(f, "score: {}", snap.score)?;
        writeln!(f, "game_over: {}", snap.game_over)?;
        writeln!(f, "next_piece: {}", snap.next_piece)?;
        match snap.current_piece {
            Some(p) => writeln!(
                f,
                "current_piece: type={} x={} y={} rotation={}",
                p.kind,
                p.x,
                p.y,
                p.rotation.index()
            )?,
            None => writeln!(f, "current_piece: (none)")?,
        }
        writeln!(f, "board:")?;
        write!(f, "{}", BoardView(&snap.board))
    }
}
