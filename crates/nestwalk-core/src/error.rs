//! Error types for recursive walk operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::PathTuple;

/// Result type alias using `WalkError`.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors reported by the walker.
///
/// Only the root variants are fatal. Every other variant is scoped to a
/// single node, identified by its [`PathTuple`], and is reported inline
/// with the record sequence; the walk continues with the node's siblings.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The root path does not exist.
    #[error("root not found: {}", path.display())]
    RootNotFound {
        /// The missing root.
        path: PathBuf,
    },

    /// The root path exists but its metadata cannot be read.
    #[error("root unreadable: {}: {source}", path.display())]
    RootUnreadable {
        /// The unreadable root.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A container is corrupt, truncated, or otherwise fails to open or
    /// list. The container is not descended into.
    #[error("archive unreadable: {names}: {source}")]
    ArchiveUnreadable {
        /// Lineage of the broken container.
        names: PathTuple,
        /// What the adapter reported.
        #[source]
        source: FormatError,
    },

    /// A member of an otherwise healthy container cannot be opened.
    #[error("member unreadable: {names}: {source}")]
    MemberUnreadable {
        /// Lineage of the member.
        names: PathTuple,
        /// What the adapter reported.
        #[source]
        source: FormatError,
    },

    /// A filesystem node below the root cannot be listed or opened.
    #[error("I/O error: {names}: {source}")]
    Io {
        /// Lineage of the node, or of the closest known ancestor when the
        /// directory listing itself failed.
        names: PathTuple,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// Returns the lineage of the node this error is scoped to.
    ///
    /// Root errors have no lineage and return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestwalk_core::WalkError;
    /// use std::path::PathBuf;
    ///
    /// let err = WalkError::RootNotFound {
    ///     path: PathBuf::from("missing"),
    /// };
    /// assert!(err.names().is_none());
    /// ```
    #[must_use]
    pub const fn names(&self) -> Option<&PathTuple> {
        match self {
            Self::RootNotFound { .. } | Self::RootUnreadable { .. } => None,
            Self::ArchiveUnreadable { names, .. }
            | Self::MemberUnreadable { names, .. }
            | Self::Io { names, .. } => Some(names),
        }
    }

    /// Returns `true` if this error ends the whole walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestwalk_core::WalkError;
    /// use std::path::PathBuf;
    ///
    /// let err = WalkError::RootNotFound {
    ///     path: PathBuf::from("missing"),
    /// };
    /// assert!(err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::RootNotFound { .. } | Self::RootUnreadable { .. })
    }

    pub(crate) fn root(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::RootNotFound { path }
        } else {
            Self::RootUnreadable { path, source }
        }
    }
}

/// Failure reported by an archive adapter, before the walker tags it with
/// the lineage of the node being processed.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O failure while reading the container or spilling a member.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip reader rejected the container or member.
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The tar stream is malformed or truncated.
    #[error("tar: {0}")]
    Tar(String),

    /// The 7z reader rejected the container or member.
    #[error("7z: {0}")]
    SevenZ(String),

    /// The stream does not start with the magic number of its format.
    #[error("not a {format} stream")]
    BadMagic {
        /// Format name the container was expected to be.
        format: &'static str,
    },

    /// The member index is not present in the container.
    #[error("no member at index {0}")]
    NoSuchMember(usize),

    /// No member with this name is present in the container.
    #[error("no member named {0:?}")]
    MemberNotFound(String),

    /// The member exists but has no readable content (directory, link,
    /// special file).
    #[error("member is not a regular file")]
    NotAFile,

    /// The node is not a container this build can open.
    #[error("not a supported container")]
    NotAContainer,
}

#[cfg(feature = "sevenz")]
impl From<sevenz_rust2::Error> for FormatError {
    fn from(err: sevenz_rust2::Error) -> Self {
        Self::SevenZ(err.to_string())
    }
}
