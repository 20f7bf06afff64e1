//! File operation vtables.
//!
//! [`FileOperations`] is what a driver registers; [`OpenFile`] is the
//! per-open state the host drives for every read, write and ioctl on one
//! open handle. Release is the `Drop` of the `OpenFile`.

use crate::errno::{Errno, Result};

pub trait FileOperations: Send + Sync {
    /// Called for every `open()` of the node
    fn open(&self) -> Result<Box<dyn OpenFile>>;
}

pub trait OpenFile: Send {
    /// Read at `*pos`, advancing it by the number of bytes returned.
    /// Returns 0 at end of data.
    fn read(&mut self, buf: &mut [u8], pos: &mut u64) -> Result<usize>;

    fn write(&mut self, data: &[u8], pos: &mut u64) -> Result<usize>;

    fn ioctl(&mut self, _cmd: u32, _arg: usize) -> Result<isize> {
        Err(Errno::NotTty)
    }
}

/// Copy `from[*pos..]` into `to`, advancing `pos`
pub fn simple_read_from_buffer(to: &mut [u8], pos: &mut u64, from: &[u8]) -> usize {
    let start = match usize::try_from(*pos) {
        Ok(start) if start < from.len() => start,
        _ => return 0,
    };
    let n = to.len().min(from.len() - start);
    to[..n].copy_from_slice(&from[start..start + n]);
    *pos += n as u64;
    n
}

/// Per-open staging buffer for read cycles.
///
/// A read at offset 0 starts a new cycle and re-renders; later reads serve
/// the rest of that rendering.
#[derive(Debug, Default)]
pub struct ReadBuffer {
    text: String,
}

impl ReadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_with(
        &mut self,
        buf: &mut [u8],
        pos: &mut u64,
        render: impl FnOnce(&mut String),
    ) -> usize {
        if *pos == 0 {
            self.text.clear();
            render(&mut self.text);
        }
        simple_read_from_buffer(buf, pos, self.text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_chunks_then_returns_zero() {
        let mut pos = 0;
        let mut out = [0u8; 4];
        let data = b"abcdefghij";

        assert_eq!(simple_read_from_buffer(&mut out, &mut pos, data), 4);
        assert_eq!(&out, b"abcd");
        assert_eq!(simple_read_from_buffer(&mut out, &mut pos, data), 4);
        assert_eq!(simple_read_from_buffer(&mut out, &mut pos, data), 2);
        assert_eq!(&out[..2], b"ij");
        assert_eq!(simple_read_from_buffer(&mut out, &mut pos, data), 0);
        assert_eq!(pos, 10);
    }

    #[test]
    fn offset_past_end_reads_nothing() {
        let mut pos = 99;
        let mut out = [0u8; 4];
        assert_eq!(simple_read_from_buffer(&mut out, &mut pos, b"abc"), 0);
        assert_eq!(pos, 99);
    }

    #[test]
    fn read_buffer_renders_only_at_offset_zero() {
        let mut buffer = ReadBuffer::new();
        let mut renders = 0;
        let mut pos = 0;
        let mut out = [0u8; 3];

        buffer.read_with(&mut out, &mut pos, |s| {
            renders += 1;
            s.push_str("hello");
        });
        buffer.read_with(&mut out, &mut pos, |s| {
            renders += 1;
            s.push_str("other");
        });
        assert_eq!(renders, 1);
        assert_eq!(&out[..2], b"lo");

        pos = 0;
        buffer.read_with(&mut out, &mut pos, |s| {
            renders += 1;
            s.push_str("fresh");
        });
        assert_eq!(renders, 2);
        assert_eq!(&out, b"fre");
        assert_eq!(buffer.len(), 5);
    }
}
