//! Container format detection.
//!
//! Detection is extension-driven and case-insensitive. Names without any
//! extension can be identified from their leading bytes instead; at most
//! [`SNIFF_LEN`] bytes are ever needed.

use std::fmt;

use super::compression::CompressionCodec;

/// Number of leading bytes [`sniff_format`] may examine.
///
/// The ustar magic sits at offset 257, everything else in the first 8.
pub const SNIFF_LEN: usize = 512;

/// 7z signature: "7z" followed by format version bytes.
const SEVENZ_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];

/// Local file header, or end of central directory for an empty zip.
const ZIP_MAGICS: [[u8; 4]; 2] = [*b"PK\x03\x04", *b"PK\x05\x06"];

const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// Container formats the walker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP archive.
    Zip,
    /// Uncompressed tar archive.
    Tar,
    /// Tar archive wrapped in a single-stream codec.
    CompressedTar(CompressionCodec),
    /// Single compressed file with no directory structure of its own.
    Compressed(CompressionCodec),
    /// 7z archive.
    SevenZ,
}

impl ArchiveFormat {
    /// Returns a short name for log and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::CompressedTar(CompressionCodec::Gzip) => "tar.gz",
            Self::CompressedTar(CompressionCodec::Bzip2) => "tar.bz2",
            Self::CompressedTar(CompressionCodec::Xz) => "tar.xz",
            Self::CompressedTar(CompressionCodec::Zstd) => "tar.zst",
            Self::Compressed(codec) => codec.name(),
            Self::SevenZ => "7z",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the final slash-separated component of `name`.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Returns `true` if the final component of `name` ends with `suffix`
/// (ASCII case-insensitive) and has something in front of it.
fn has_suffix(name: &str, suffix: &str) -> bool {
    let base = base_name(name);
    base.len() > suffix.len()
        && base
            .get(base.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Detects the container format from a file or member name.
///
/// Only the final component is considered, so member names such as
/// `archive/abc.zip` work unchanged.
///
/// # Examples
///
/// ```
/// use nestwalk_core::formats::detect::{detect_format, ArchiveFormat};
/// use nestwalk_core::formats::compression::CompressionCodec;
///
/// assert_eq!(detect_format("WinTest.ZIP"), Some(ArchiveFormat::Zip));
/// assert_eq!(
///     detect_format("archive.tar.gz"),
///     Some(ArchiveFormat::CompressedTar(CompressionCodec::Gzip))
/// );
/// assert_eq!(
///     detect_format("archive/world.txt.gz"),
///     Some(ArchiveFormat::Compressed(CompressionCodec::Gzip))
/// );
/// assert_eq!(detect_format("test.csv"), None);
/// ```
#[must_use]
pub fn detect_format(name: &str) -> Option<ArchiveFormat> {
    for codec in CompressionCodec::ALL {
        if codec.tar_suffixes().iter().any(|s| has_suffix(name, s)) {
            return Some(ArchiveFormat::CompressedTar(codec));
        }
    }
    if has_suffix(name, ".tar") {
        return Some(ArchiveFormat::Tar);
    }
    if has_suffix(name, ".zip") {
        return Some(ArchiveFormat::Zip);
    }
    if has_suffix(name, ".7z") {
        return Some(ArchiveFormat::SevenZ);
    }
    CompressionCodec::ALL
        .into_iter()
        .find(|codec| has_suffix(name, codec.suffix()))
        .map(ArchiveFormat::Compressed)
}

/// Returns `true` if the final component of `name` has no extension.
///
/// A leading dot (hidden file) does not count as an extension.
#[must_use]
pub fn lacks_extension(name: &str) -> bool {
    let base = base_name(name);
    !base.is_empty() && !base.chars().skip(1).any(|c| c == '.')
}

/// Identifies a container from the leading bytes of its content.
///
/// A bare compressed stream is reported as [`ArchiveFormat::Compressed`];
/// telling a compressed tar apart would require decoding, which detection
/// never does.
///
/// # Examples
///
/// ```
/// use nestwalk_core::formats::detect::{sniff_format, ArchiveFormat};
///
/// assert_eq!(sniff_format(b"PK\x03\x04rest"), Some(ArchiveFormat::Zip));
/// assert_eq!(sniff_format(b"hello"), None);
/// ```
#[must_use]
pub fn sniff_format(prefix: &[u8]) -> Option<ArchiveFormat> {
    if ZIP_MAGICS.iter().any(|magic| prefix.starts_with(magic)) {
        return Some(ArchiveFormat::Zip);
    }
    if prefix.starts_with(&SEVENZ_MAGIC) {
        return Some(ArchiveFormat::SevenZ);
    }
    if let Some(codec) = CompressionCodec::sniff(prefix) {
        return Some(ArchiveFormat::Compressed(codec));
    }
    if prefix
        .get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len())
        .is_some_and(|magic| magic == USTAR_MAGIC)
    {
        return Some(ArchiveFormat::Tar);
    }
    None
}

/// Returns the name of the synthetic member of a single-stream container:
/// the container's own name with the codec suffix removed.
///
/// Names that do not carry the suffix (detected by content) are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use nestwalk_core::formats::compression::CompressionCodec;
/// use nestwalk_core::formats::detect::strip_codec_suffix;
///
/// assert_eq!(
///     strip_codec_suffix("archive/world.txt.gz", CompressionCodec::Gzip),
///     "archive/world.txt"
/// );
/// assert_eq!(strip_codec_suffix("DATA.BZ2", CompressionCodec::Bzip2), "DATA");
/// assert_eq!(strip_codec_suffix("blob", CompressionCodec::Xz), "blob");
/// ```
#[must_use]
pub fn strip_codec_suffix(name: &str, codec: CompressionCodec) -> &str {
    if has_suffix(name, codec.suffix()) {
        &name[..name.len() - codec.suffix().len()]
    } else {
        name
    }
}
