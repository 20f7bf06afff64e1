//! The `/dev/tetris` misc device.
//!
//! Writes drive the game one command byte at a time; reads return a text
//! frame of the current board. Every open file shares the module's game.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tetris_chardev_types::Command;
use tetris_chardev_core::{DeviceFrame, RenderStyle};

use crate::errno::{Errno, Result};
use crate::file::{FileOperations, OpenFile, ReadBuffer};
use crate::shared::SharedGame;

pub struct InputDevice {
    game: SharedGame,
    style: RenderStyle,
    open_count: Arc<AtomicUsize>,
}

impl InputDevice {
    pub fn new(game: SharedGame, style: RenderStyle) -> Self {
        Self {
            game,
            style,
            open_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Files currently open on this device
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }
}

impl FileOperations for InputDevice {
    fn open(&self) -> Result<Box<dyn OpenFile>> {
        let open = self.open_count.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("tetris: device opened ({} open)", open);
        Ok(Box::new(InputFile {
            game: self.game.clone(),
            style: self.style,
            buffer: ReadBuffer::new(),
            open_count: self.open_count.clone(),
        }))
    }
}

pub struct InputFile {
    game: SharedGame,
    style: RenderStyle,
    buffer: ReadBuffer,
    open_count: Arc<AtomicUsize>,
}

impl InputFile {
    fn apply(&self, command: Command) -> bool {
        let changed = self.game.with_exclusive(|g| g.apply_command(command));
        log::debug!("tetris: {} (changed: {})", command.as_str(), changed);
        changed
    }
}

impl OpenFile for InputFile {
    fn read(&mut self, buf: &mut [u8], pos: &mut u64) -> Result<usize> {
        let game = &self.game;
        let style = self.style;
        Ok(self.buffer.read_with(buf, pos, |out| {
            let snapshot = game.with_shared_read(|g| g.snapshot());
            let _ = write!(
                out,
                "{}",
                DeviceFrame {
                    snapshot: &snapshot,
                    style,
                }
            );
        }))
    }

    fn write(&mut self, data: &[u8], _pos: &mut u64) -> Result<usize> {
        let Some(&byte) = data.first() else {
            return Ok(0);
        };
        match Command::from_byte(byte) {
            Some(command) => {
                self.apply(command);
            }
            None => log::trace!("tetris: ignoring byte {:#04x}", byte),
        }
        Ok(data.len())
    }

    fn ioctl(&mut self, cmd: u32, _arg: usize) -> Result<isize> {
        let command = Command::from_ioctl(cmd).ok_or(Errno::Invalid)?;
        self.apply(command);
        Ok(0)
    }
}

impl Drop for InputFile {
    fn drop(&mut self) {
        let open = self.open_count.fetch_sub(1, Ordering::SeqCst) - 1;
        log::debug!("tetris: device released ({} open)", open);
    }
}
