//! Screen: draws the harness's text panes to a real terminal.
//!
//! Every draw is a full redraw of plain text lines. Nothing here knows about
//! the game; it is handed whatever the device files returned.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Print, ResetColor, SetAttribute},
    terminal::{self, ClearType},
    QueueableCommand,
};

/// Columns between the two panes
pub const PANE_GAP: usize = 4;

pub const HELP: &str = "a/d/left/right move  s/down drop  w/up rotate  space hard drop  r restart  q quit";

/// Lay two blocks of text out side by side, padding the left block to its
/// widest line.
pub fn compose_columns(left: &str, right: &str, gap: usize) -> Vec<String> {
    let left: Vec<&str> = left.lines().collect();
    let right: Vec<&str> = right.lines().collect();
    let width = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    (0..left.len().max(right.len()))
        .map(|i| {
            let l = left.get(i).copied().unwrap_or("");
            let r = right.get(i).copied().unwrap_or("");
            let pad = width - l.chars().count() + gap;
            format!("{}{}{}", l, " ".repeat(pad), r).trim_end().to_string()
        })
        .collect()
}

pub struct Screen {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Redraw: device frame and diagnostic report side by side, the help
    /// line, then as much of the kernel log as fits.
    pub fn draw(&mut self, frame: &str, report: &str, dmesg: &[String]) -> Result<()> {
        let (_, rows) = terminal::size().unwrap_or((80, 24));
        let mut lines = compose_columns(frame, report, PANE_GAP);
        lines.push(String::new());
        lines.push(HELP.to_string());
        lines.push(String::new());

        let room = (rows as usize).saturating_sub(lines.len());
        let skip = dmesg.len().saturating_sub(room);
        lines.extend(dmesg[skip..].iter().cloned());

        self.buf.clear();
        self.buf.queue(terminal::Clear(ClearType::All))?;
        for (y, line) in lines.iter().take(rows as usize).enumerate() {
            self.buf.queue(cursor::MoveTo(0, y as u16))?;
            self.buf.queue(Print(line))?;
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}
