//! Single-stream compressed files (`.gz`, `.bz2`, `.xz`, `.zst`).
//!
//! Such a file is treated as a container holding exactly one member whose
//! name is the container's own name (the last component of its lineage)
//! with the codec suffix removed.

use std::fs::File;
use std::io::Read;
use std::io::Seek;

use super::compression::CompressionCodec;
use super::detect::strip_codec_suffix;
use super::traits::ArchiveAdapter;
use super::traits::Member;
use super::traits::MemberKind;
use crate::error::FormatError;
use crate::io::EntryReader;

/// Opened single-stream compressed file.
#[derive(Debug)]
pub struct StreamContainer {
    file: File,
    codec: CompressionCodec,
    members: [Member; 1],
}

impl StreamContainer {
    /// Checks the codec magic of `file` and derives the member name from
    /// `name`, the name of the compressed file itself.
    ///
    /// Only the magic is checked here; corruption further into the stream
    /// surfaces when the member is read.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::BadMagic`] if the stream does not start with
    /// the codec's magic number.
    pub fn open(mut file: File, codec: CompressionCodec, name: &str) -> Result<Self, FormatError> {
        file.rewind()?;
        let magic = codec.magic();
        let mut prefix = vec![0u8; magic.len()];
        let mut filled = 0;
        while filled < prefix.len() {
            match file.read(&mut prefix[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        if prefix[..filled] != *magic {
            return Err(FormatError::BadMagic {
                format: codec.name(),
            });
        }

        let member = member_name(name, codec);
        Ok(Self {
            file,
            codec,
            members: [Member::new(member, MemberKind::Regular)],
        })
    }

    /// Returns the codec of the stream.
    #[must_use]
    pub const fn codec(&self) -> CompressionCodec {
        self.codec
    }
}

/// Derives the synthetic member name: `name` with host separators folded
/// to `/`, minus the codec suffix.
fn member_name(name: &str, codec: CompressionCodec) -> String {
    let name = name.replace(std::path::MAIN_SEPARATOR, "/");
    strip_codec_suffix(&name, codec).to_string()
}

impl ArchiveAdapter for StreamContainer {
    fn members(&self) -> &[Member] {
        &self.members
    }

    fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError> {
        self.regular_member(index)?;
        self.file.rewind()?;
        let decoder = self.codec.decoder(&mut self.file)?;
        Ok(EntryReader::new(decoder))
    }

    fn format_name(&self) -> &'static str {
        self.codec.name()
    }
}
