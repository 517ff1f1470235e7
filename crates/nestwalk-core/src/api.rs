//! High-level public API.

use std::fs;
use std::fs::File;
use std::io;
use std::io::Seek;
use std::path::Path;

use crate::Result;
use crate::WalkBuilder;
use crate::WalkConfig;
use crate::WalkError;
use crate::Walker;
use crate::classify::classify_member;
use crate::classify::file_name;
use crate::classify::should_sniff;
use crate::classify::sniff_reader;
use crate::error::FormatError;
use crate::formats::AdapterRegistry;
use crate::formats::ArchiveAdapter;
use crate::formats::ArchiveFormat;
use crate::formats::Container;
use crate::formats::detect::detect_format;
use crate::io::CopyBuffer;
use crate::io::EntryReader;
use crate::io::spill;
use crate::types::FileType;
use crate::types::PathTuple;

/// Walks `root` with the default configuration.
///
/// Shorthand for `WalkBuilder::new().root(root).build()`.
///
/// # Errors
///
/// Returns [`WalkError::RootNotFound`] or [`WalkError::RootUnreadable`] if
/// the root cannot be examined.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), nestwalk_core::WalkError> {
/// let mut walker = nestwalk_core::walk("archive.tar.gz")?;
/// while let Some(result) = walker.next_entry() {
///     let result = result?;
///     println!("{} {}", result.typ(), result.names());
/// }
/// # Ok(())
/// # }
/// ```
pub fn walk<P: AsRef<Path>>(root: P) -> Result<Walker> {
    WalkBuilder::new().root(root).build()
}

/// Opens the content of one file node directly from its lineage.
///
/// Every intermediate component must name a container, found by exact
/// member name (the first match wins when names repeat). The content is
/// staged in an anonymous temporary file, so the returned stream does not
/// borrow anything.
///
/// # Errors
///
/// - [`WalkError::RootNotFound`] / [`WalkError::RootUnreadable`] if the
///   filesystem component cannot be examined
/// - [`WalkError::ArchiveUnreadable`] if an intermediate component is not a
///   container this configuration can open, or is corrupt
/// - [`WalkError::MemberUnreadable`] if a member is missing or the final
///   node is not a regular file
/// - [`WalkError::Io`] if a filesystem-level node is not a regular file
///
/// # Examples
///
/// ```no_run
/// use nestwalk_core::{PathTuple, WalkConfig, open_path};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let names = PathTuple::new("archive.tar.gz")
///     .join("archive/abc.zip")
///     .join("abc.txt");
/// let content = open_path(&names, &WalkConfig::default())?.read_all()?;
/// # Ok(())
/// # }
/// ```
pub fn open_path(names: &PathTuple, config: &WalkConfig) -> Result<EntryReader<'static>> {
    let root = names.root();
    let metadata =
        fs::symlink_metadata(root).map_err(|e| WalkError::root(root.to_path_buf(), e))?;
    let root_names = PathTuple::new(root);
    let io_error = |source: io::Error| WalkError::Io {
        names: root_names.clone(),
        source,
    };

    if !metadata.is_file() {
        return Err(io_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let mut file = File::open(root).map_err(io_error)?;
    let Some((last, intermediate)) = names.members().split_last() else {
        return Ok(EntryReader::new(file));
    };

    let registry = AdapterRegistry::new(config.capabilities());
    let mut buffer = CopyBuffer::new();

    let name = file_name(root);
    let format = match detect_format(&name) {
        Some(format) => Some(format),
        None if should_sniff(FileType::File, &name, config.sniff_content) => {
            let sniffed = sniff_reader(&mut file).map_err(io_error)?;
            file.rewind().map_err(io_error)?;
            sniffed
        }
        None => None,
    };
    let mut current = root_names;
    let mut container = open_container(&registry, format, file, &current, &mut buffer)?;

    for member_name in intermediate {
        let member_names = current.join(member_name.as_str());
        let member_error = |source| WalkError::MemberUnreadable {
            names: member_names.clone(),
            source,
        };
        let index = find_member(&container, member_name).map_err(member_error)?;

        let mut format = match classify_member(&container.members()[index]) {
            FileType::Archive => detect_format(member_name),
            _ => None,
        };
        if format.is_none() && should_sniff(FileType::File, member_name, config.sniff_content) {
            let mut reader = container.open_member(index).map_err(member_error)?;
            format = sniff_reader(&mut reader)
                .map_err(|e| member_error(FormatError::Io(e)))?;
        }

        let mut reader = container.open_member(index).map_err(member_error)?;
        let spilled = spill(&mut reader, &mut buffer).map_err(|e| member_error(e.into()))?;
        drop(reader);

        container = open_container(&registry, format, spilled, &member_names, &mut buffer)?;
        current = member_names;
    }

    let final_names = current.join(last.as_str());
    let member_error = |source| WalkError::MemberUnreadable {
        names: final_names.clone(),
        source,
    };
    let index = find_member(&container, last).map_err(member_error)?;
    let mut reader = container.open_member(index).map_err(member_error)?;
    let staged = spill(&mut reader, &mut buffer).map_err(|e| member_error(e.into()))?;
    Ok(EntryReader::new(staged))
}

fn open_container(
    registry: &AdapterRegistry,
    format: Option<ArchiveFormat>,
    file: File,
    names: &PathTuple,
    buffer: &mut CopyBuffer,
) -> Result<Container> {
    let format = format
        .filter(|format| registry.supports(*format))
        .ok_or(FormatError::NotAContainer);
    format
        .and_then(|format| registry.open(format, file, &names.last_name(), buffer))
        .map_err(|source| WalkError::ArchiveUnreadable {
            names: names.clone(),
            source,
        })
}

fn find_member(container: &Container, name: &str) -> std::result::Result<usize, FormatError> {
    container
        .members()
        .iter()
        .position(|member| member.name == name)
        .ok_or_else(|| FormatError::MemberNotFound(name.to_string()))
}
