//! Node type classification.
//!
//! Classification never follows symbolic links and never decodes
//! anything. The only I/O it may do is reading a short prefix of an
//! extensionless file when content sniffing is enabled.

use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;

use crate::formats::ArchiveFormat;
use crate::formats::Member;
use crate::formats::MemberKind;
use crate::formats::detect::SNIFF_LEN;
use crate::formats::detect::detect_format;
use crate::formats::detect::lacks_extension;
use crate::formats::detect::sniff_format;
use crate::types::FileType;

/// Classifies a filesystem node from its link metadata.
///
/// `metadata` must come from [`fs::symlink_metadata`]; a symbolic link is
/// reported as such, never as its target.
///
/// # Examples
///
/// ```no_run
/// use nestwalk_core::FileType;
/// use nestwalk_core::classify::classify_metadata;
/// use std::path::Path;
///
/// let path = Path::new("data.tar.gz");
/// let metadata = std::fs::symlink_metadata(path)?;
/// assert_eq!(classify_metadata(path, &metadata), FileType::Archive);
/// # Ok::<(), std::io::Error>(())
/// ```
#[must_use]
pub fn classify_metadata(path: &Path, metadata: &fs::Metadata) -> FileType {
    classify_file_type(path, metadata.file_type())
}

/// Classifies a filesystem node from its file type.
///
/// Regular files whose name matches a container format are
/// [`FileType::Archive`]; fifos, sockets and devices are
/// [`FileType::Other`].
#[must_use]
pub fn classify_file_type(path: &Path, file_type: fs::FileType) -> FileType {
    if file_type.is_symlink() {
        FileType::Symlink
    } else if file_type.is_dir() {
        FileType::Dir
    } else if file_type.is_file() {
        if detect_format(&file_name(path)).is_some() {
            FileType::Archive
        } else {
            FileType::File
        }
    } else {
        FileType::Other
    }
}

/// Classifies an archive member from its declared kind and name.
#[must_use]
pub fn classify_member(member: &Member) -> FileType {
    match member.kind {
        MemberKind::Directory => FileType::Dir,
        MemberKind::Link => FileType::Symlink,
        MemberKind::Special => FileType::Other,
        MemberKind::Regular if detect_format(&member.name).is_some() => FileType::Archive,
        MemberKind::Regular => FileType::File,
    }
}

/// Returns `true` if a node classified `typ` under `name` should have its
/// content sniffed for a container magic number.
#[must_use]
pub fn should_sniff(typ: FileType, name: &str, sniff_content: bool) -> bool {
    sniff_content && typ == FileType::File && lacks_extension(name)
}

/// Reads up to [`SNIFF_LEN`] bytes from `reader` and identifies a
/// container format from them.
///
/// # Errors
///
/// Returns any error from the reader.
pub fn sniff_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut prefix = [0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < prefix.len() {
        match reader.read(&mut prefix[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(sniff_format(&prefix[..filled]))
}

/// Name used for extension-based detection of a filesystem node.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
