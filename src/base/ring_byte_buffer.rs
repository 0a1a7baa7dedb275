use std::cmp::min;
use std::io::{self, Read, Write};

/// Fixed capacity byte queue between the stream and the reply decoder.
///
/// Bytes are appended at the tail by `read_from` (or `Write`) and consumed from the
/// head with `current_read_slice` + `skip_bytes`. The readable region may wrap, in
/// which case `current_read_slice` returns the part up to the end of the storage and
/// the remainder becomes visible after skipping it.
///
/// # Example
///
/// ```rust
/// # use std::io::Write;
/// # use glk::base::RingByteBuffer;
/// let mut buffer = RingByteBuffer::with_capacity(100);
/// buffer.write(&[0xFE, 0x58]).unwrap();
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.current_read_slice(), &[0xFE, 0x58]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RingByteBuffer {
    buf: Vec<u8>,
    head: usize,
    size: usize,
}

impl RingByteBuffer {
    /// Creates a new `RingByteBuffer` with the specified capacity.
    pub fn with_capacity(capacity: usize) -> RingByteBuffer {
        RingByteBuffer {
            buf: vec![0; capacity],
            head: 0,
            size: 0,
        }
    }

    /// Returns the number of bytes currently stored in the buffer.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the buffer contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the total capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the amount of free space available in the buffer in bytes.
    pub fn free_space(&self) -> usize {
        self.buf.len() - self.size
    }

    /// Discards every stored byte.
    pub fn clear(&mut self) {
        self.head = 0;
        self.size = 0;
    }

    fn tail(&self) -> usize {
        (self.head + self.size) % self.buf.len()
    }

    /// Returns the contiguous readable portion starting at the head.
    pub fn current_read_slice(&self) -> &[u8] {
        let end = min(self.head + self.size, self.buf.len());
        &self.buf[self.head..end]
    }

    /// Removes up to `bytes` from the head and returns how many were removed.
    pub fn skip_bytes(&mut self, bytes: usize) -> usize {
        let skipped = min(self.size, bytes);
        self.head = (self.head + skipped) % self.buf.len();
        self.size -= skipped;
        skipped
    }

    fn current_write_slice(&mut self) -> &mut [u8] {
        let current_end = self.tail();
        let write_buf_end = min(self.buf.len(), current_end + self.free_space());
        &mut self.buf[current_end..write_buf_end]
    }

    fn mark_bytes_as_written(&mut self, bytes: usize) {
        let written = min(self.free_space(), bytes);
        self.size += written;
    }

    fn partial_read_from(&mut self, upstream: &mut impl Read) -> io::Result<usize> {
        if self.free_space() == 0 {
            return Ok(0);
        }

        match upstream.read(self.current_write_slice()) {
            Ok(read) => {
                self.mark_bytes_as_written(read);
                Ok(read)
            }
            Err(err) => match err.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
                    Ok(0)
                }
                _ => Err(err),
            },
        }
    }

    /// Fills the buffer from `upstream`, wrapping at most once.
    ///
    /// A stream timeout counts as zero bytes read; the caller owns the deadline.
    pub fn read_from(&mut self, upstream: &mut impl Read) -> io::Result<usize> {
        let read = self.partial_read_from(upstream)?;
        if read == 0 {
            return Ok(0);
        }
        let latter_read = self.partial_read_from(upstream)?;
        Ok(read + latter_read)
    }
}

impl Write for RingByteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = {
            let current_write_slice = self.current_write_slice();
            let written = min(current_write_slice.len(), buf.len());
            current_write_slice[0..written].clone_from_slice(&buf[0..written]);
            written
        };
        self.mark_bytes_as_written(written);

        let latter_written = {
            let current_write_slice = self.current_write_slice();
            let latter_written = min(current_write_slice.len(), buf.len() - written);
            current_write_slice[0..latter_written]
                .clone_from_slice(&buf[written..written + latter_written]);
            latter_written
        };
        self.mark_bytes_as_written(latter_written);

        Ok(written + latter_written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
