//! Spilling member streams into anonymous temporary files.
//!
//! Zip, tar and 7z containers need random access to their backing storage,
//! but a member of an enclosing container is only available as a forward
//! stream. The member is copied once into an unnamed temporary file, which
//! the operating system deletes as soon as the handle is dropped. Memory
//! use stays bounded by the copy buffer no matter how large the member is.

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::io::{self};

/// Buffer size for copy operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap-allocated buffer reused across copy operations.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer` through `buffer`, returning the number of
/// bytes copied.
///
/// # Errors
///
/// Returns the first read or write error. Interrupted reads are retried.
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}

/// Copies `reader` into a new anonymous temporary file and rewinds it.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or the copy
/// fails.
///
/// # Examples
///
/// ```
/// use nestwalk_core::io::CopyBuffer;
/// use nestwalk_core::io::spill;
/// use std::io::Read;
///
/// let mut buffer = CopyBuffer::new();
/// let mut file = spill(&mut &b"hello"[..], &mut buffer)?;
/// let mut out = String::new();
/// file.read_to_string(&mut out)?;
/// assert_eq!(out, "hello");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn spill<R: Read + ?Sized>(reader: &mut R, buffer: &mut CopyBuffer) -> io::Result<File> {
    let mut file = tempfile::tempfile()?;
    let bytes = copy_with_buffer(reader, &mut file, buffer)?;
    file.rewind()?;
    log::debug!("spilled {bytes} bytes to temporary file");
    Ok(file)
}
