//! ZIP container adapter.

use std::fs::File;

use super::traits::ArchiveAdapter;
use super::traits::Member;
use super::traits::MemberKind;
use crate::error::FormatError;
use crate::io::EntryReader;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFDIR: u32 = 0o040_000;

/// Opened ZIP archive.
///
/// Members are listed in central-directory order. Directories that are
/// only implied by member paths are not synthesized.
pub struct ZipContainer {
    archive: zip::ZipArchive<File>,
    members: Vec<Member>,
}

impl ZipContainer {
    /// Reads the central directory of `file`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Zip`] if the central directory is missing or
    /// corrupt.
    pub fn open(file: File) -> Result<Self, FormatError> {
        let mut archive = zip::ZipArchive::new(file)?;

        let mut members = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            // Raw access reads only the headers, so members with an
            // unsupported compression method still list.
            let entry = archive.by_index_raw(i)?;
            let kind = member_kind(entry.name(), entry.is_dir(), entry.unix_mode());
            members.push(Member::new(entry.name(), kind));
        }

        Ok(Self { archive, members })
    }
}

fn member_kind(name: &str, is_dir: bool, unix_mode: Option<u32>) -> MemberKind {
    let file_type = unix_mode.map(|mode| mode & S_IFMT);
    if is_dir || name.ends_with('/') || file_type == Some(S_IFDIR) {
        MemberKind::Directory
    } else if file_type == Some(S_IFLNK) {
        MemberKind::Link
    } else {
        MemberKind::Regular
    }
}

impl ArchiveAdapter for ZipContainer {
    fn members(&self) -> &[Member] {
        &self.members
    }

    fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError> {
        self.regular_member(index)?;
        let entry = self.archive.by_index(index)?;
        Ok(EntryReader::new(entry))
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }
}
