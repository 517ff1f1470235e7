//! Single-stream compression codecs.
//!
//! The same codecs serve two roles: as a standalone container with one
//! synthetic member (`notes.txt.gz`), and as the outer layer of a
//! compressed tar stream (`archive.tar.gz`).
//!
//! # Supported Codecs
//!
//! - **Gzip** (.gz): multi-member streams are decoded to the end
//! - **Bzip2** (.bz2): multi-stream files are decoded to the end
//! - **Xz** (.xz): concatenated streams are decoded to the end
//! - **Zstd** (.zst): concatenated frames are decoded to the end

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use crate::error::FormatError;

/// Compression codec of a single-stream file.
///
/// # Examples
///
/// ```
/// use nestwalk_core::formats::compression::CompressionCodec;
///
/// assert_eq!(CompressionCodec::Gzip.suffix(), ".gz");
/// assert_eq!(CompressionCodec::sniff(&[0x1F, 0x8B, 0x08]), Some(CompressionCodec::Gzip));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate).
    Gzip,

    /// Bzip2 (Burrows-Wheeler).
    Bzip2,

    /// Xz (LZMA2).
    Xz,

    /// Zstandard.
    Zstd,
}

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];

impl CompressionCodec {
    /// All codecs, in detection order.
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Zstd];

    /// Returns the file suffix of a standalone compressed file.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
            Self::Xz => ".xz",
            Self::Zstd => ".zst",
        }
    }

    /// Returns the short suffixes used for compressed tar files.
    #[must_use]
    pub const fn tar_suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Gzip => &[".tar.gz", ".tgz"],
            Self::Bzip2 => &[".tar.bz2", ".tbz", ".tbz2"],
            Self::Xz => &[".tar.xz", ".txz"],
            Self::Zstd => &[".tar.zst", ".tzst"],
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Returns the magic number every stream of this codec starts with.
    #[must_use]
    pub const fn magic(self) -> &'static [u8] {
        match self {
            Self::Gzip => GZIP_MAGIC,
            Self::Bzip2 => BZIP2_MAGIC,
            Self::Xz => XZ_MAGIC,
            Self::Zstd => ZSTD_MAGIC,
        }
    }

    /// Identifies the codec from the leading bytes of a stream.
    #[must_use]
    pub fn sniff(prefix: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|codec| prefix.starts_with(codec.magic()))
    }

    /// Wraps `reader` in a decoder for this codec.
    ///
    /// The leading bytes are checked against the codec's magic number
    /// first, so a mislabeled file fails here instead of on first read.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::BadMagic`] if the stream does not start with
    /// the codec's magic number, or an I/O error if it cannot be read.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Result<Box<dyn Read + 'a>, FormatError> {
        let mut reader = BufReader::new(reader);
        let head = reader.fill_buf()?;
        if !head.starts_with(self.magic()) {
            return Err(FormatError::BadMagic {
                format: self.name(),
            });
        }

        let decoder: Box<dyn Read + 'a> = match self {
            Self::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::with_buffer(reader)?),
        };
        Ok(decoder)
    }
}
