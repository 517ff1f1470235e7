//! 7z container adapter.
//!
//! The header database is read once on open. `sevenz-rust2` only exposes
//! member content through a sequential callback over the whole archive, so
//! opening a member decodes forward until the member is reached and spills
//! it into a temporary file. Reading every member of a large solid archive
//! this way costs one decode pass per member.

use std::fs::File;
use std::io::Seek;

use sevenz_rust2::Archive;
use sevenz_rust2::ArchiveReader;
use sevenz_rust2::Password;

use super::traits::ArchiveAdapter;
use super::traits::Member;
use super::traits::MemberKind;
use crate::error::FormatError;
use crate::io::CopyBuffer;
use crate::io::EntryReader;
use crate::io::spill;

const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
/// Set by p7zip when the high 16 bits carry a unix mode.
const FILE_ATTRIBUTE_UNIX_EXTENSION: u32 = 0x8000;
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

#[derive(Debug, Clone, Copy)]
struct StreamInfo {
    has_stream: bool,
    /// How many earlier members with a stream share this member's name.
    occurrence: usize,
}

/// Opened 7z archive backed by a seekable file.
#[derive(Debug)]
pub struct SevenZContainer {
    file: File,
    members: Vec<Member>,
    streams: Vec<StreamInfo>,
}

impl SevenZContainer {
    /// Reads the header database of `file`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::SevenZ`] if the archive is corrupt, truncated
    /// or encrypted.
    pub fn open(mut file: File) -> Result<Self, FormatError> {
        file.rewind()?;
        let archive = Archive::read(&mut file, &Password::empty())?;

        let mut members: Vec<Member> = Vec::with_capacity(archive.files.len());
        let mut streams: Vec<StreamInfo> = Vec::with_capacity(archive.files.len());
        for entry in &archive.files {
            let kind = if entry.is_directory() {
                MemberKind::Directory
            } else if is_symlink(entry.has_windows_attributes, entry.windows_attributes) {
                MemberKind::Link
            } else {
                MemberKind::Regular
            };

            let occurrence = members
                .iter()
                .zip(&streams)
                .filter(|(m, s)| s.has_stream && m.name == entry.name)
                .count();
            members.push(Member::new(entry.name.clone(), kind));
            streams.push(StreamInfo {
                has_stream: entry.has_stream,
                occurrence,
            });
        }

        Ok(Self {
            file,
            members,
            streams,
        })
    }
}

fn is_symlink(has_attributes: bool, attributes: u32) -> bool {
    if !has_attributes {
        return false;
    }
    if attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
        return true;
    }
    attributes & FILE_ATTRIBUTE_UNIX_EXTENSION != 0 && (attributes >> 16) & S_IFMT == S_IFLNK
}

impl ArchiveAdapter for SevenZContainer {
    fn members(&self) -> &[Member] {
        &self.members
    }

    fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError> {
        let name = self.regular_member(index)?.name.clone();
        let info = self.streams[index];
        if !info.has_stream {
            return Ok(EntryReader::new(std::io::empty()));
        }

        self.file.rewind()?;
        let mut reader = ArchiveReader::new(&mut self.file, Password::empty())?;
        let mut buffer = CopyBuffer::new();
        let mut seen = 0;
        let mut spilled = None;

        // Returning `false` does not end the pass; later entries still
        // reach the callback and must not replace the spilled member.
        reader.for_each_entries(|entry, content| {
            if spilled.is_some() {
                return Ok(false);
            }
            if !entry.has_stream || entry.name != name {
                return Ok(true);
            }
            let occurrence = seen;
            seen += 1;
            if occurrence < info.occurrence {
                return Ok(true);
            }
            let file = spill(content, &mut buffer)
                .map_err(|e| sevenz_rust2::Error::Other(e.to_string().into()))?;
            spilled = Some(file);
            Ok(false)
        })?;

        let file = spilled.ok_or(FormatError::MemberNotFound(name))?;
        Ok(EntryReader::new(file))
    }

    fn format_name(&self) -> &'static str {
        "7z"
    }
}
