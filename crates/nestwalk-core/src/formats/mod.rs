//! Container format implementations.
//!
//! Every supported format implements [`ArchiveAdapter`]. The walker never
//! talks to a concrete adapter; it asks the [`AdapterRegistry`] to open a
//! [`Container`] for a detected [`ArchiveFormat`].

pub mod compression;
pub mod detect;
#[cfg(feature = "sevenz")]
pub mod sevenz;
pub mod stream;
pub mod tar;
pub mod traits;
pub mod zip;

use std::fs::File;

pub use compression::CompressionCodec;
pub use detect::ArchiveFormat;
#[cfg(feature = "sevenz")]
pub use sevenz::SevenZContainer;
pub use stream::StreamContainer;
pub use tar::TarContainer;
pub use traits::ArchiveAdapter;
pub use traits::Member;
pub use traits::MemberKind;
pub use zip::ZipContainer;

use crate::config::Capabilities;
use crate::error::FormatError;
use crate::io::CopyBuffer;
use crate::io::EntryReader;
use crate::io::spill;

/// An opened container of any supported format.
pub enum Container {
    /// ZIP archive.
    Zip(ZipContainer),
    /// Tar archive, possibly decoded from a compressed tar.
    Tar(TarContainer),
    /// Single compressed stream.
    Stream(StreamContainer),
    /// 7z archive.
    #[cfg(feature = "sevenz")]
    SevenZ(SevenZContainer),
}

impl ArchiveAdapter for Container {
    fn members(&self) -> &[Member] {
        match self {
            Self::Zip(c) => c.members(),
            Self::Tar(c) => c.members(),
            Self::Stream(c) => c.members(),
            #[cfg(feature = "sevenz")]
            Self::SevenZ(c) => c.members(),
        }
    }

    fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError> {
        match self {
            Self::Zip(c) => c.open_member(index),
            Self::Tar(c) => c.open_member(index),
            Self::Stream(c) => c.open_member(index),
            #[cfg(feature = "sevenz")]
            Self::SevenZ(c) => c.open_member(index),
        }
    }

    fn format_name(&self) -> &'static str {
        match self {
            Self::Zip(c) => c.format_name(),
            Self::Tar(c) => c.format_name(),
            Self::Stream(c) => c.format_name(),
            #[cfg(feature = "sevenz")]
            Self::SevenZ(c) => c.format_name(),
        }
    }
}

/// Maps detected formats to adapters, honoring the capabilities of the
/// current build and configuration.
#[derive(Debug, Clone, Copy)]
pub struct AdapterRegistry {
    caps: Capabilities,
}

impl AdapterRegistry {
    /// Creates a registry limited to `caps`.
    #[must_use]
    pub const fn new(caps: Capabilities) -> Self {
        Self { caps }
    }

    /// Returns `true` if containers of `format` can be opened.
    #[must_use]
    pub const fn supports(&self, format: ArchiveFormat) -> bool {
        match format {
            ArchiveFormat::SevenZ => self.caps.sevenz,
            _ => true,
        }
    }

    /// Opens `file` as a container of `format`.
    ///
    /// `name` is the final name of the container node; single-stream
    /// containers derive their member name from it. Compressed tars are
    /// decoded into a temporary file through `buffer` first.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NotAContainer`] for formats this registry does
    /// not support, or whatever the adapter reports for a corrupt
    /// container.
    pub fn open(
        &self,
        format: ArchiveFormat,
        file: File,
        name: &str,
        buffer: &mut CopyBuffer,
    ) -> Result<Container, FormatError> {
        if !self.supports(format) {
            return Err(FormatError::NotAContainer);
        }

        let container = match format {
            ArchiveFormat::Zip => Container::Zip(ZipContainer::open(file)?),
            ArchiveFormat::Tar => Container::Tar(TarContainer::open(file)?),
            ArchiveFormat::CompressedTar(codec) => {
                let mut decoder = codec.decoder(file)?;
                let decoded = spill(&mut decoder, buffer)?;
                Container::Tar(TarContainer::open(decoded)?)
            }
            ArchiveFormat::Compressed(codec) => {
                Container::Stream(StreamContainer::open(file, codec, name)?)
            }
            #[cfg(feature = "sevenz")]
            ArchiveFormat::SevenZ => Container::SevenZ(SevenZContainer::open(file)?),
            #[cfg(not(feature = "sevenz"))]
            ArchiveFormat::SevenZ => return Err(FormatError::NotAContainer),
        };
        log::debug!(
            "opened {format} container {name:?} with {} members",
            container.members().len()
        );
        Ok(container)
    }
}
