//! Node type enumeration.

use std::fmt;

/// Classified type of a node produced by the walker.
///
/// Only [`FileType::File`] nodes carry a content stream.
/// [`FileType::Dir`] and [`FileType::Archive`] nodes are descended into;
/// the remaining variants are leaves.
///
/// # Examples
///
/// ```
/// use nestwalk_core::FileType;
///
/// assert!(FileType::File.has_content());
/// assert!(FileType::Archive.is_container());
/// assert!(!FileType::Symlink.is_container());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileType {
    /// Regular file with readable content.
    File,

    /// Filesystem directory or directory member of an archive.
    Dir,

    /// Regular file that is a supported container or compressed stream.
    Archive,

    /// Symbolic link. Never followed, never read.
    Symlink,

    /// Fifo, socket, device, or anything else that cannot be categorized.
    Other,
}

impl FileType {
    /// Returns `true` if nodes of this type carry a content stream.
    #[must_use]
    pub const fn has_content(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if the walker descends into nodes of this type.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Dir | Self::Archive)
    }

    /// Returns the upper-case name used in listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Dir => "DIR",
            Self::Archive => "ARCHIVE",
            Self::Symlink => "SYMLINK",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
