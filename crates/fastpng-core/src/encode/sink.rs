//! In-memory output sink for the PNG writer.

use std::io::{self, Write};

/// Appends every chunk the PNG writer emits to a caller-owned buffer.
///
/// Growth uses fallible reservation so running out of memory surfaces as an
/// I/O error instead of aborting the process. Writes that would take the
/// buffer past `limit` bytes fail the same way. Flushing is a no-op.
#[derive(Debug)]
pub(crate) struct OutputSink<'a> {
    buf: &'a mut Vec<u8>,
    limit: usize,
}

impl<'a> OutputSink<'a> {
    /// Wrap `buf` with no size limit, reserving `initial` bytes up front.
    #[cfg(test)]
    pub(crate) fn with_reserve(buf: &'a mut Vec<u8>, initial: usize) -> io::Result<Self> {
        Self::with_limit(buf, initial, usize::MAX)
    }

    /// Wrap `buf`, reserving `initial` bytes and refusing to grow past `limit`.
    pub(crate) fn with_limit(buf: &'a mut Vec<u8>, initial: usize, limit: usize) -> io::Result<Self> {
        if initial > limit {
            return Err(limit_error(limit));
        }
        buf.try_reserve(initial)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        Ok(Self { buf, limit })
    }
}

fn limit_error(limit: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::OutOfMemory,
        format!("output limit of {limit} bytes exceeded"),
    )
}

impl Write for OutputSink<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if data.len() > self.limit.saturating_sub(self.buf.len()) {
            return Err(limit_error(self.limit));
        }
        self.buf
            .try_reserve(data.len())
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
