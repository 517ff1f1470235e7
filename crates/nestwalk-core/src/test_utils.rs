//! Test utilities for building in-memory containers.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::Cursor;
use std::io::Seek;
use std::io::Write;

use crate::formats::CompressionCodec;

/// Writes `data` into an anonymous temporary file, rewound to the start.
pub fn to_tempfile(data: &[u8]) -> File {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(data).unwrap();
    file.rewind().unwrap();
    file
}

/// Compresses `data` as a single stream of `codec`.
pub fn compress(codec: CompressionCodec, data: &[u8]) -> Vec<u8> {
    match codec {
        CompressionCodec::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Zstd => zstd::encode_all(data, 0).unwrap(),
    }
}

/// Builder for tar test archives with various entry types.
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new tar test builder.
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory. The name is stored verbatim, trailing slash
    /// included.
    pub fn add_directory(mut self, path: &str) -> Self {
        let header = raw_header(path, tar::EntryType::Directory, 0o755);
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }

    /// Adds a symlink.
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Symlink)
    }

    /// Adds a hardlink.
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Link)
    }

    /// Adds a named pipe.
    pub fn add_fifo(mut self, path: &str) -> Self {
        let header = raw_header(path, tar::EntryType::Fifo, 0o644);
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }

    fn add_link(mut self, path: &str, target: &str, kind: tar::EntryType) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(kind);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Builds and returns the tar archive data.
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `set_path` normalizes away trailing slashes, so the name bytes are
/// written directly.
fn raw_header(path: &str, kind: tar::EntryType, mode: u32) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    let name = &mut header.as_gnu_mut().unwrap().name;
    name[..path.len()].copy_from_slice(path.as_bytes());
    header.set_size(0);
    header.set_mode(mode);
    header.set_entry_type(kind);
    header.set_cksum();
    header
}

/// Builder for zip test archives with various entry types.
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new zip test builder.
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file.
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_with_method(path, data, zip::CompressionMethod::Stored)
    }

    /// Adds a deflated file.
    pub fn add_deflated_file(self, path: &str, data: &[u8]) -> Self {
        self.add_with_method(path, data, zip::CompressionMethod::Deflated)
    }

    fn add_with_method(mut self, path: &str, data: &[u8], method: zip::CompressionMethod) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory.
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink.
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        use zip::write::SimpleFileOptions;

        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Builds and returns the zip archive data.
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for 7z test archives.
#[cfg(feature = "sevenz")]
#[derive(Default)]
pub struct SevenZTestBuilder {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

#[cfg(feature = "sevenz")]
impl SevenZTestBuilder {
    /// Creates a new 7z test builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.entries.push((path.to_string(), Some(data.to_vec())));
        self
    }

    /// Adds a directory.
    pub fn add_directory(mut self, path: &str) -> Self {
        self.entries.push((path.to_string(), None));
        self
    }

    /// Builds and returns the 7z archive data.
    pub fn build(self) -> Vec<u8> {
        use sevenz_rust2::ArchiveEntry;
        use sevenz_rust2::ArchiveWriter;

        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new())).unwrap();
        for (name, data) in self.entries {
            match data {
                Some(data) => {
                    writer
                        .push_archive_entry(ArchiveEntry::new_file(&name), Some(Cursor::new(data)))
                        .unwrap();
                }
                None => {
                    writer
                        .push_archive_entry::<&[u8]>(ArchiveEntry::new_directory(&name), None)
                        .unwrap();
                }
            }
        }
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_tar_directory_keeps_trailing_slash() {
        let data = TarTestBuilder::new().add_directory("dir/").build();
        let mut archive = tar::Archive::new(&data[..]);
        let entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(&*entry.path_bytes(), b"dir/");
        assert_eq!(entry.header().entry_type(), tar::EntryType::Directory);
    }

    #[test]
    fn test_to_tempfile_is_rewound() {
        let mut file = to_tempfile(b"abc");
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_zip_builder() {
        let data = ZipTestBuilder::new()
            .add_file("file.txt", b"content")
            .add_directory("dir/")
            .build();
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
