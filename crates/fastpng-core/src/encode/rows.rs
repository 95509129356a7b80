//! Row streaming: the compression pass over a validated sample buffer.
//!
//! The pass runs on a dedicated scoped worker thread so a long compression
//! does not block the caller's thread. The worker borrows the caller's buffer
//! read-only; it never copies the image. On `wasm32` there are no threads and
//! the pass runs inline.

use std::io::{self, Write};
#[cfg(not(target_arch = "wasm32"))]
use std::thread;

use thiserror::Error;

use super::types::{BitDepth, EncodeRequest};

#[cfg(not(target_arch = "wasm32"))]
const ROW_WORKER_NAME: &str = "fastpng-rows";

/// A fatal condition inside the row pass.
#[derive(Debug, Error)]
pub(crate) enum StreamError {
    #[error(transparent)]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("unable to start row worker: {0}")]
    Spawn(io::Error),

    #[error("row worker panicked")]
    WorkerPanicked,
}

/// Row-start offsets into a tightly packed, row-major sample buffer.
///
/// Computed once per encode call and never mutated. Borrows the caller's
/// buffer, so it cannot outlive it.
#[derive(Debug)]
pub struct RowView<'a> {
    samples: &'a [u8],
    offsets: Box<[usize]>,
    span: usize,
    depth: BitDepth,
}

impl<'a> RowView<'a> {
    /// One offset per row, the first at 0, each following one `row_span` further.
    pub fn new(request: &EncodeRequest<'a>) -> Self {
        let span = request.row_span();
        let offsets = (0..request.height() as usize)
            .map(|row| row * span)
            .collect();

        Self {
            samples: request.samples(),
            offsets,
            span,
            depth: request.depth(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Bytes per row.
    #[inline]
    pub fn span(&self) -> usize {
        self.span
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Bytes of row `index`, or `None` past the last row.
    pub fn row(&self, index: usize) -> Option<&'a [u8]> {
        let start = *self.offsets.get(index)?;
        self.samples.get(start..start + self.span)
    }

    /// Rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        let samples = self.samples;
        let span = self.span;
        self.offsets
            .iter()
            .map(move |&start| &samples[start..start + span])
    }
}

/// Convert little-endian 16-bit samples in `row` to PNG's big-endian order.
fn swap_to_big_endian(row: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend(
        row.chunks_exact(2)
            .flat_map(|pair| u16::from_le_bytes([pair[0], pair[1]]).to_be_bytes()),
    );
}

/// Push every row through the filter and compressor, then write the trailer.
///
/// Rows go out in ascending order. The trailer is only written once every
/// row has been accepted.
pub(crate) fn write_rows<W: Write>(
    mut writer: png::Writer<W>,
    rows: &RowView<'_>,
) -> Result<(), StreamError> {
    {
        let mut stream = writer.stream_writer()?;

        match rows.depth() {
            BitDepth::Eight => {
                for row in rows.iter() {
                    stream.write_all(row)?;
                }
            }
            BitDepth::Sixteen => {
                let mut swapped = Vec::with_capacity(rows.span());
                for row in rows.iter() {
                    swap_to_big_endian(row, &mut swapped);
                    stream.write_all(&swapped)?;
                }
            }
        }

        stream.finish()?;
    }

    writer.finish()?;
    log::trace!("streamed {} rows of {} bytes", rows.len(), rows.span());
    Ok(())
}

/// Run [`write_rows`] on a dedicated worker thread and wait for it.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn stream_rows<W: Write + Send>(
    writer: png::Writer<W>,
    rows: &RowView<'_>,
) -> Result<(), StreamError> {
    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name(ROW_WORKER_NAME.to_string())
            .spawn_scoped(scope, move || write_rows(writer, rows))
            .map_err(StreamError::Spawn)?;

        match worker.join() {
            Ok(result) => result,
            Err(_) => Err(StreamError::WorkerPanicked),
        }
    })
}

/// Run [`write_rows`] inline; `wasm32` has no threads to hand it to.
#[cfg(target_arch = "wasm32")]
pub(crate) fn stream_rows<W: Write + Send>(
    writer: png::Writer<W>,
    rows: &RowView<'_>,
) -> Result<(), StreamError> {
    write_rows(writer, rows)
}
