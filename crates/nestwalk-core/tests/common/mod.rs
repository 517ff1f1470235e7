//! Shared fixtures for the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use nestwalk_core::FileType;
use nestwalk_core::PathTuple;
use nestwalk_core::Walker;
use zip::write::SimpleFileOptions;

/// One record, with its filesystem component made relative to the
/// fixture directory and its content read out.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Record {
    pub names: Vec<String>,
    pub typ: FileType,
    pub data: Option<Vec<u8>>,
}

impl Record {
    pub fn new(names: &[&str], typ: FileType, data: Option<&[u8]>) -> Self {
        Self {
            names: names.iter().map(ToString::to_string).collect(),
            typ,
            data: data.map(<[u8]>::to_vec),
        }
    }
}

/// Converts a tuple to relative, slash-joined components.
pub fn relative(names: &PathTuple, base: &Path) -> Vec<String> {
    let root = names.root().strip_prefix(base).unwrap_or(names.root());
    let root = root
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    let root = if root.is_empty() { ".".to_string() } else { root };
    std::iter::once(root)
        .chain(names.members().iter().cloned())
        .collect()
}

/// Drains `walker`, panicking on any error, and returns sorted records.
pub fn collect(walker: &mut Walker, base: &Path) -> Vec<Record> {
    let mut records = Vec::new();
    while let Some(result) = walker.next_entry() {
        let mut result = result.unwrap();
        let data = result.read_to_end().unwrap();
        records.push(Record {
            names: relative(result.names(), base),
            typ: result.typ(),
            data,
        });
    }
    records.sort();
    records
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn bzip2(data: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn xz(data: &[u8]) -> Vec<u8> {
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub enum TarEntry<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
    Symlink(&'a str, &'a str),
    Fifo(&'a str),
}

pub fn tar(entries: &[TarEntry<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for entry in entries {
        match *entry {
            TarEntry::File(path, data) => {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, path, data).unwrap();
            }
            TarEntry::Dir(path) => {
                let header = raw_tar_header(path, tar::EntryType::Directory);
                builder.append(&header, std::io::empty()).unwrap();
            }
            TarEntry::Fifo(path) => {
                let header = raw_tar_header(path, tar::EntryType::Fifo);
                builder.append(&header, std::io::empty()).unwrap();
            }
            TarEntry::Symlink(path, target) => {
                let mut header = tar::Header::new_gnu();
                header.set_size(0);
                header.set_mode(0o777);
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_link_name(target).unwrap();
                header.set_cksum();
                builder
                    .append_data(&mut header, path, std::io::empty())
                    .unwrap();
            }
        }
    }
    builder.into_inner().unwrap()
}

fn raw_tar_header(path: &str, kind: tar::EntryType) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    let name = &mut header.as_gnu_mut().unwrap().name;
    name[..path.len()].copy_from_slice(path.as_bytes());
    header.set_size(0);
    header.set_mode(0o755);
    header.set_entry_type(kind);
    header.set_cksum();
    header
}

pub enum ZipEntry<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
    Symlink(&'a str, &'a str),
}

pub fn zip(entries: &[ZipEntry<'_>]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for entry in entries {
        match *entry {
            ZipEntry::File(path, data) => {
                writer.start_file(path, options).unwrap();
                writer.write_all(data).unwrap();
            }
            ZipEntry::Dir(path) => writer.add_directory(path, options).unwrap(),
            ZipEntry::Symlink(path, target) => writer.add_symlink(path, target, options).unwrap(),
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Builds a zip of uncompressed files, so header fields sit at fixed offsets.
pub fn stored_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for &(path, data) in files {
        writer.start_file(path, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Builds a 7z archive; entries with `None` data are directories.
#[cfg(feature = "sevenz")]
pub fn sevenz(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
    use sevenz_rust2::ArchiveEntry;
    use sevenz_rust2::ArchiveWriter;

    let mut writer = ArchiveWriter::new(Cursor::new(Vec::new())).unwrap();
    for &(name, data) in entries {
        match data {
            Some(data) => {
                writer
                    .push_archive_entry(ArchiveEntry::new_file(name), Some(data))
                    .unwrap();
            }
            None => {
                writer
                    .push_archive_entry::<&[u8]>(ArchiveEntry::new_directory(name), None)
                    .unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Stand-in for a 7z archive when the adapter is not compiled in; only
/// the name matters then.
#[cfg(not(feature = "sevenz"))]
pub fn sevenz(_entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
    vec![0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0, 4]
}

pub const TEST_CSV: &[u8] = b"\"ID\",\"Name\",\"Age\"\n1,\"Foo\",23\n2,\"Bar\",45\n3,\"Quz\",67\n";

/// Writes the reference tree into `dir`.
///
/// Contains plain files, a zip without directory entries, a gzipped tar
/// with a nested zip and a nested gzip, zips with symlinks and a nested
/// tgz and 7z, a 7z with a nested tgz, and a subdirectory with a
/// bzip2-compressed tar of single-stream files.
pub fn write_fixture_tree(dir: &Path) {
    fs::write(dir.join("test.csv"), TEST_CSV).unwrap();

    fs::write(
        dir.join("WinTest.ZIP"),
        zip(&[
            ZipEntry::File("Foo.txt", b"Foo\r\nBar\r\n"),
            ZipEntry::File("World/Hello.txt", b"Hello\r\nWorld"),
        ]),
    )
    .unwrap();

    let abc = zip(&[
        ZipEntry::File("abc.txt", b"One two three\nfour five six\nseven eight nine\n"),
        ZipEntry::File("def.txt", b"3.14159\n"),
    ]);
    let world = gzip(b"This is a file\n");
    let archive = tar(&[
        TarEntry::Dir("archive/"),
        TarEntry::File("archive/abc.zip", &abc),
        TarEntry::File("archive/iii.dat", b"jjj\nkkk\nlll\n"),
        TarEntry::File("archive/world.txt.gz", &world),
        TarEntry::File("archive/xyz.txt", b"XYZ!\n"),
        TarEntry::Fifo("archive/fifo"),
        TarEntry::Dir("archive/test2/"),
        TarEntry::Symlink("archive/test2/jjj.dat", "../iii.dat"),
    ]);
    fs::write(dir.join("archive.tar.gz"), gzip(&archive)).unwrap();

    fs::write(
        dir.join("linktest.zip"),
        zip(&[
            ZipEntry::Dir("linktest/"),
            ZipEntry::File("linktest/hello.txt", b"Hi there\n"),
            ZipEntry::Symlink("linktest/world.txt", "hello.txt"),
        ]),
    )
    .unwrap();

    let texts = gzip(&tar(&[
        TarEntry::File("one.txt", b"111\n11\n1\n"),
        TarEntry::File("two.txt", b"2222\n222\n22\n2\n"),
        TarEntry::File("three.txt", b"33333\n3333\n333\n33\n3\n"),
    ]));
    let xyz = sevenz(&[
        ("even.txt", Some(b"Adding")),
        ("more", None),
        ("more/stuff.txt", Some(b"Testing\r\nTesting")),
    ]);
    fs::write(
        dir.join("more.zip"),
        zip(&[
            ZipEntry::Dir("more/"),
            ZipEntry::Dir("more/stuff/"),
            ZipEntry::File("more/stuff/five.txt", b"5\n5\n5\n5\n5\n"),
            ZipEntry::File("more/stuff/six.txt", b"6\n6\n6\n6\n6\n6\n"),
            ZipEntry::File("more/stuff/four.txt", b"4\n4\n4\n4\n"),
            ZipEntry::File("more/stuff/texts.tgz", &texts),
            ZipEntry::File("more/stuff/xyz.7z", &xyz),
        ]),
    )
    .unwrap();

    let wuv = gzip(&tar(&[TarEntry::File("uvw.txt", b"This\nis\na\n7z\ntest\n")]));
    fs::write(
        dir.join("opt.7z"),
        sevenz(&[("thing", None), ("thing/wuv.tgz", Some(&wuv))]),
    )
    .unwrap();

    let subdir = dir.join("subdir");
    fs::create_dir(&subdir).unwrap();
    fs::write(subdir.join("ooo.txt"), b"oOoOoOo\n\n").unwrap();
    fs::write(
        subdir.join("foo.zip"),
        zip(&[
            ZipEntry::File("hello.txt", b"Hallo\nWelt\n"),
            ZipEntry::Dir("foo/"),
            ZipEntry::File("foo/bar.txt", b"Blah\nblah\n"),
        ]),
    )
    .unwrap();
    let lzma = xz(b"Another format!\n");
    let bz = bzip2(b"And another!\n");
    let formats = tar(&[
        TarEntry::Dir("formats/"),
        TarEntry::File("formats/lzma.txt.xz", &lzma),
        TarEntry::File("formats/bzip2.txt.bz2", &bz),
    ]);
    fs::write(subdir.join("formats.tar.bz2"), bzip2(&formats)).unwrap();
}

/// Records the reference tree is expected to produce, sorted.
pub fn expected_records() -> Vec<Record> {
    use FileType::Archive;
    use FileType::Dir;
    use FileType::File;
    use FileType::Other;
    use FileType::Symlink;

    let mut expected = vec![
        Record::new(&["."], Dir, None),
        Record::new(&["test.csv"], File, Some(TEST_CSV)),
        Record::new(&["WinTest.ZIP"], Archive, None),
        Record::new(&["WinTest.ZIP", "Foo.txt"], File, Some(b"Foo\r\nBar\r\n")),
        Record::new(&["WinTest.ZIP", "World/Hello.txt"], File, Some(b"Hello\r\nWorld")),
        Record::new(&["archive.tar.gz"], Archive, None),
        Record::new(&["archive.tar.gz", "archive/"], Dir, None),
        Record::new(&["archive.tar.gz", "archive/abc.zip"], Archive, None),
        Record::new(
            &["archive.tar.gz", "archive/abc.zip", "abc.txt"],
            File,
            Some(b"One two three\nfour five six\nseven eight nine\n"),
        ),
        Record::new(
            &["archive.tar.gz", "archive/abc.zip", "def.txt"],
            File,
            Some(b"3.14159\n"),
        ),
        Record::new(&["archive.tar.gz", "archive/iii.dat"], File, Some(b"jjj\nkkk\nlll\n")),
        Record::new(&["archive.tar.gz", "archive/world.txt.gz"], Archive, None),
        Record::new(
            &["archive.tar.gz", "archive/world.txt.gz", "archive/world.txt"],
            File,
            Some(b"This is a file\n"),
        ),
        Record::new(&["archive.tar.gz", "archive/xyz.txt"], File, Some(b"XYZ!\n")),
        Record::new(&["archive.tar.gz", "archive/fifo"], Other, None),
        Record::new(&["archive.tar.gz", "archive/test2/"], Dir, None),
        Record::new(&["archive.tar.gz", "archive/test2/jjj.dat"], Symlink, None),
        Record::new(&["linktest.zip"], Archive, None),
        Record::new(&["linktest.zip", "linktest/"], Dir, None),
        Record::new(&["linktest.zip", "linktest/hello.txt"], File, Some(b"Hi there\n")),
        Record::new(&["linktest.zip", "linktest/world.txt"], Symlink, None),
        Record::new(&["more.zip"], Archive, None),
        Record::new(&["more.zip", "more/"], Dir, None),
        Record::new(&["more.zip", "more/stuff/"], Dir, None),
        Record::new(&["more.zip", "more/stuff/five.txt"], File, Some(b"5\n5\n5\n5\n5\n")),
        Record::new(&["more.zip", "more/stuff/six.txt"], File, Some(b"6\n6\n6\n6\n6\n6\n")),
        Record::new(&["more.zip", "more/stuff/four.txt"], File, Some(b"4\n4\n4\n4\n")),
        Record::new(&["more.zip", "more/stuff/texts.tgz"], Archive, None),
        Record::new(
            &["more.zip", "more/stuff/texts.tgz", "one.txt"],
            File,
            Some(b"111\n11\n1\n"),
        ),
        Record::new(
            &["more.zip", "more/stuff/texts.tgz", "two.txt"],
            File,
            Some(b"2222\n222\n22\n2\n"),
        ),
        Record::new(
            &["more.zip", "more/stuff/texts.tgz", "three.txt"],
            File,
            Some(b"33333\n3333\n333\n33\n3\n"),
        ),
        Record::new(&["more.zip", "more/stuff/xyz.7z"], Archive, None),
        Record::new(&["opt.7z"], Archive, None),
        Record::new(&["subdir"], Dir, None),
        Record::new(&["subdir/ooo.txt"], File, Some(b"oOoOoOo\n\n")),
        Record::new(&["subdir/foo.zip"], Archive, None),
        Record::new(&["subdir/foo.zip", "hello.txt"], File, Some(b"Hallo\nWelt\n")),
        Record::new(&["subdir/foo.zip", "foo/"], Dir, None),
        Record::new(&["subdir/foo.zip", "foo/bar.txt"], File, Some(b"Blah\nblah\n")),
        Record::new(&["subdir/formats.tar.bz2"], Archive, None),
        Record::new(&["subdir/formats.tar.bz2", "formats/"], Dir, None),
        Record::new(&["subdir/formats.tar.bz2", "formats/lzma.txt.xz"], Archive, None),
        Record::new(
            &["subdir/formats.tar.bz2", "formats/lzma.txt.xz", "formats/lzma.txt"],
            File,
            Some(b"Another format!\n"),
        ),
        Record::new(&["subdir/formats.tar.bz2", "formats/bzip2.txt.bz2"], Archive, None),
        Record::new(
            &["subdir/formats.tar.bz2", "formats/bzip2.txt.bz2", "formats/bzip2.txt"],
            File,
            Some(b"And another!\n"),
        ),
    ];

    if cfg!(feature = "sevenz") {
        expected.extend([
            Record::new(&["more.zip", "more/stuff/xyz.7z", "even.txt"], File, Some(b"Adding")),
            Record::new(&["more.zip", "more/stuff/xyz.7z", "more"], Dir, None),
            Record::new(
                &["more.zip", "more/stuff/xyz.7z", "more/stuff.txt"],
                File,
                Some(b"Testing\r\nTesting"),
            ),
            Record::new(&["opt.7z", "thing"], Dir, None),
            Record::new(&["opt.7z", "thing/wuv.tgz"], Archive, None),
            Record::new(
                &["opt.7z", "thing/wuv.tgz", "uvw.txt"],
                File,
                Some(b"This\nis\na\n7z\ntest\n"),
            ),
        ]);
    }

    expected.sort();
    expected
}
