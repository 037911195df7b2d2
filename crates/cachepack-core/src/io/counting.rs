//! Byte-counting writer.

use std::io::Write;

/// Wraps a writer and counts the bytes that reach it.
///
/// Placed between the output file and the compressor, it measures the size
/// of the finished archive without another `stat`.
///
/// # Examples
///
/// ```
/// use cachepack_core::io::CountingWriter;
/// use std::io::Write;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"Hello, ")?;
/// writer.write_all(b"World!")?;
/// assert_eq!(writer.total_bytes(), 13);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Creates a new counting writer.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Returns the number of bytes successfully written so far.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Unwraps the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
