//! Common types and trait for archive adapters.

use crate::error::FormatError;
use crate::io::EntryReader;

/// Type of a member as declared by its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Regular entry with content.
    Regular,
    /// Directory marker.
    Directory,
    /// Symbolic link.
    Link,
    /// Hard link, fifo, device, or any entry type the adapter does not
    /// understand.
    Special,
}

/// One immediate member of an opened container.
///
/// The member's position in [`ArchiveAdapter::members`] is its locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Name as stored in the container.
    pub name: String,
    /// Declared type.
    pub kind: MemberKind,
}

impl Member {
    /// Creates a member descriptor.
    #[must_use]
    pub fn new<S: Into<String>>(name: S, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Capability shared by every container format.
pub trait ArchiveAdapter {
    /// Returns the immediate members in the container's own order.
    fn members(&self) -> &[Member];

    /// Opens the content of the member at `index`.
    ///
    /// The returned stream borrows the container; at most one member
    /// stream can exist at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range, the member is not a
    /// regular entry, or its content cannot be opened.
    fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError>;

    /// Returns the format name.
    fn format_name(&self) -> &'static str;

    /// Looks up a regular member and fails with the right error otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NoSuchMember`] or [`FormatError::NotAFile`].
    fn regular_member(&self, index: usize) -> Result<&Member, FormatError> {
        let member = self
            .members()
            .get(index)
            .ok_or(FormatError::NoSuchMember(index))?;
        if member.kind == MemberKind::Regular {
            Ok(member)
        } else {
            Err(FormatError::NotAFile)
        }
    }
}
