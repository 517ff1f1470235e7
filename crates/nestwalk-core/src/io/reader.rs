//! Content stream handed out for file nodes.

use std::fmt;
use std::io::Read;
use std::io::{self};

/// Readable content of one file node.
///
/// The lifetime ties the stream to whatever owns its backing storage: for
/// records produced by the walker that is the walker itself, so the stream
/// cannot be used once the walker has advanced.
pub struct EntryReader<'a> {
    inner: Box<dyn Read + 'a>,
}

impl<'a> EntryReader<'a> {
    /// Wraps a reader.
    pub fn new<R: Read + 'a>(reader: R) -> Self {
        Self {
            inner: Box::new(reader),
        }
    }

    /// Reads the remaining content into a vector.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying stream, including
    /// decompression failures.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.inner.read_to_end(&mut out)?;
        Ok(out)
    }
}

impl Read for EntryReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl fmt::Debug for EntryReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryReader").finish_non_exhaustive()
    }
}
