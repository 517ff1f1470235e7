//! Tar container adapter.
//!
//! The whole header chain is read once when the container is opened, and
//! the data offset of every member is recorded. Opening a member is then a
//! seek into the backing file. Compressed tar streams never reach this
//! adapter directly: they are decoded through their single-stream codec
//! into a temporary file first (see [`super::open_container`]).

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

use super::traits::ArchiveAdapter;
use super::traits::Member;
use super::traits::MemberKind;
use crate::error::FormatError;
use crate::io::CopyBuffer;
use crate::io::EntryReader;
use crate::io::spill;

/// Where a member's data lives in the backing file.
#[derive(Debug, Clone, Copy)]
struct DataLocation {
    /// Position of the entry in the raw entry sequence.
    ordinal: usize,
    offset: u64,
    size: u64,
    /// GNU sparse entries cannot be read by offset; they are re-read
    /// through the tar reader.
    sparse: bool,
}

/// Opened tar archive backed by a seekable file.
#[derive(Debug)]
pub struct TarContainer {
    file: File,
    members: Vec<Member>,
    locations: Vec<DataLocation>,
}

impl TarContainer {
    /// Lists the members of the tar archive in `file`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Tar`] if a header is corrupt or the archive is
    /// truncated before the end of a member's data.
    pub fn open(mut file: File) -> Result<Self, FormatError> {
        let file_len = file.metadata()?.len();
        file.rewind()?;

        let mut members = Vec::new();
        let mut locations = Vec::new();
        {
            let mut archive = tar::Archive::new(&mut file);
            let entries = archive
                .entries_with_seek()
                .map_err(|e| FormatError::Tar(format!("failed to read entries: {e}")))?;

            for (ordinal, entry) in entries.enumerate() {
                let entry =
                    entry.map_err(|e| FormatError::Tar(format!("failed to read entry: {e}")))?;
                let entry_type = entry.header().entry_type();
                let Some(kind) = member_kind(entry_type) else {
                    continue;
                };

                let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
                let sparse = entry_type.is_gnu_sparse();
                let offset = entry.raw_file_position();
                let size = if sparse {
                    entry.header().entry_size().unwrap_or(0)
                } else {
                    entry.size()
                };

                if offset.saturating_add(size) > file_len {
                    return Err(FormatError::Tar(format!(
                        "truncated data for member {name:?}"
                    )));
                }

                members.push(Member::new(name, kind));
                locations.push(DataLocation {
                    ordinal,
                    offset,
                    size,
                    sparse,
                });
            }
        }

        Ok(Self {
            file,
            members,
            locations,
        })
    }

    fn read_sparse(&mut self, ordinal: usize) -> Result<File, FormatError> {
        self.file.rewind()?;
        let mut archive = tar::Archive::new(&mut self.file);
        let mut entry = archive
            .entries()
            .map_err(|e| FormatError::Tar(e.to_string()))?
            .nth(ordinal)
            .ok_or(FormatError::NoSuchMember(ordinal))?
            .map_err(|e| FormatError::Tar(e.to_string()))?;
        let mut buffer = CopyBuffer::new();
        Ok(spill(&mut entry, &mut buffer)?)
    }
}

/// Maps a tar entry type to a member kind; `None` for metadata records
/// that are not members. Hard links are neither files nor symbolic links
/// and land in [`MemberKind::Special`].
fn member_kind(entry_type: tar::EntryType) -> Option<MemberKind> {
    match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
            Some(MemberKind::Regular)
        }
        tar::EntryType::Directory => Some(MemberKind::Directory),
        tar::EntryType::Symlink => Some(MemberKind::Link),
        tar::EntryType::XGlobalHeader
        | tar::EntryType::XHeader
        | tar::EntryType::GNULongName
        | tar::EntryType::GNULongLink => None,
        _ => Some(MemberKind::Special),
    }
}

impl ArchiveAdapter for TarContainer {
    fn members(&self) -> &[Member] {
        &self.members
    }

    fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError> {
        self.regular_member(index)?;
        let location = self.locations[index];

        if location.sparse {
            let spilled = self.read_sparse(location.ordinal)?;
            return Ok(EntryReader::new(spilled));
        }

        self.file.seek(SeekFrom::Start(location.offset))?;
        Ok(EntryReader::new((&mut self.file).take(location.size)))
    }

    fn format_name(&self) -> &'static str {
        "tar"
    }
}
