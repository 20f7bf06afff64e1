//! Read-only diagnostic file in debugfs.

use std::fmt::Write as _;

use tetris_chardev_core::StatusReport;

use crate::errno::{Errno, Result};
use crate::file::{FileOperations, OpenFile, ReadBuffer};
use crate::shared::SharedGame;

/// Name of the file inside the module's debugfs directory
pub const STATE_FILE: &str = "state";

pub struct DiagnosticEndpoint {
    game: SharedGame,
}

impl DiagnosticEndpoint {
    pub fn new(game: SharedGame) -> Self {
        Self { game }
    }
}

impl FileOperations for DiagnosticEndpoint {
    fn open(&self) -> Result<Box<dyn OpenFile>> {
        Ok(Box::new(DiagnosticFile {
            game: self.game.clone(),
            buffer: ReadBuffer::new(),
        }))
    }
}

pub struct DiagnosticFile {
    game: SharedGame,
    buffer: ReadBuffer,
}

impl OpenFile for DiagnosticFile {
    fn read(&mut self, buf: &mut [u8], pos: &mut u64) -> Result<usize> {
        let game = &self.game;
        Ok(self.buffer.read_with(buf, pos, |out| {
            let snapshot = game.with_shared_read(|g| g.snapshot());
            let _ = write!(out, "{}", StatusReport(&snapshot));
        }))
    }

    fn write(&mut self, _data: &[u8], _pos: &mut u64) -> Result<usize> {
        Err(Errno::NotSupported)
    }
}
