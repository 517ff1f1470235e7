//! Depth-first walk over directories and nested containers.
//!
//! The walker is a lending iterator: each record may carry a stream that
//! borrows the walker, so the record must be dropped before the walker
//! can advance. Work for a record is split in two. First the walker
//! decides what the next record is (a [`Step`]) without holding on to any
//! container; then, for file records only, it opens the content stream
//! and hands it out.

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::classify::classify_file_type;
use crate::classify::classify_member;
use crate::classify::file_name;
use crate::classify::should_sniff;
use crate::classify::sniff_reader;
use crate::config::WalkConfig;
use crate::error::FormatError;
use crate::error::Result;
use crate::error::WalkError;
use crate::formats::AdapterRegistry;
use crate::formats::ArchiveFormat;
use crate::formats::MemberKind;
use crate::formats::detect::detect_format;
use crate::io::EntryReader;
use crate::stack::ResourceStack;
use crate::summary::WalkSummary;
use crate::types::FileType;
use crate::types::PathTuple;

type Filter = Box<dyn FnMut(&PathTuple) -> bool>;

/// One record produced by the walker.
///
/// A record carries a content stream if and only if its type is
/// [`FileType::File`].
#[derive(Debug)]
pub struct WalkResult<'a> {
    names: PathTuple,
    typ: FileType,
    stream: Option<EntryReader<'a>>,
}

impl<'a> WalkResult<'a> {
    pub(crate) const fn file(names: PathTuple, stream: EntryReader<'a>) -> Self {
        Self {
            names,
            typ: FileType::File,
            stream: Some(stream),
        }
    }

    pub(crate) fn node(names: PathTuple, typ: FileType) -> Self {
        debug_assert!(!typ.has_content(), "file records need a stream");
        Self {
            names,
            typ,
            stream: None,
        }
    }

    /// Returns the lineage of the node.
    #[must_use]
    pub const fn names(&self) -> &PathTuple {
        &self.names
    }

    /// Returns the type of the node.
    #[must_use]
    pub const fn typ(&self) -> FileType {
        self.typ
    }

    /// Returns the content stream of a file node.
    pub fn stream_mut(&mut self) -> Option<&mut EntryReader<'a>> {
        self.stream.as_mut()
    }

    /// Consumes the record, returning the content stream of a file node.
    #[must_use]
    pub fn into_stream(self) -> Option<EntryReader<'a>> {
        self.stream
    }

    /// Reads the remaining content of a file node.
    ///
    /// Returns `Ok(None)` for nodes without content.
    ///
    /// # Errors
    ///
    /// Returns any error from the content stream, including decompression
    /// failures.
    pub fn read_to_end(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.stream.as_mut().map(EntryReader::read_all).transpose()
    }
}

impl fmt::Display for WalkResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.typ, self.names)
    }
}

/// Where the bytes of a node come from.
#[derive(Debug)]
enum Source {
    Path(PathBuf),
    /// Member index in the innermost open container.
    Member(usize),
}

/// A container yielded as `ARCHIVE` whose members are walked next.
#[derive(Debug)]
struct Descend {
    names: PathTuple,
    format: ArchiveFormat,
    source: Source,
}

/// What the next record is, decided before any stream is opened.
#[derive(Debug)]
enum Step {
    Node(PathTuple, FileType),
    File(PathTuple, Source),
    Error(WalkError),
}

struct FsWalk {
    root: PathBuf,
    entries: walkdir::IntoIter,
}

impl FsWalk {
    fn new(root: PathBuf, config: &WalkConfig) -> Self {
        let mut walk = WalkDir::new(&root)
            .follow_links(false)
            .follow_root_links(config.follow_root_links);
        if config.sort_dirs {
            walk = walk.sort_by_file_name();
        }
        log::debug!("walking root {}", root.display());
        Self {
            root,
            entries: walk.into_iter(),
        }
    }
}

/// Lazy, depth-first walk over one or more roots.
///
/// Created by [`walk`](crate::walk) or [`WalkBuilder`].
///
/// # Examples
///
/// ```no_run
/// use nestwalk_core::FileType;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut walker = nestwalk_core::walk("data")?;
/// while let Some(result) = walker.next_entry() {
///     let mut result = result?;
///     if result.typ() == FileType::File {
///         let content = result.read_to_end()?.unwrap_or_default();
///         println!("{} ({} bytes)", result.names(), content.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Walker {
    roots: VecDeque<PathBuf>,
    config: WalkConfig,
    filter: Option<Filter>,
    fs: Option<FsWalk>,
    stack: ResourceStack,
    pending: Option<Descend>,
    summary: WalkSummary,
    finished: bool,
}

impl Walker {
    /// Produces the next record.
    ///
    /// Node-scoped errors are returned inline and the walk continues with
    /// the next node, unless [`WalkConfig::fail_fast`] is set. Returns
    /// `None` once every root has been walked.
    pub fn next_entry(&mut self) -> Option<std::result::Result<WalkResult<'_>, WalkError>> {
        if self.finished {
            self.shutdown();
            return None;
        }

        let step = match self.pending.take().and_then(|descend| self.descend(descend)) {
            Some(err) => Step::Error(err),
            None => match self.advance() {
                Some(step) => step,
                None => {
                    self.finished = true;
                    return None;
                }
            },
        };

        match step {
            Step::Node(names, typ) => {
                self.summary.record(typ);
                log::trace!("{typ} {names}");
                Some(Ok(WalkResult::node(names, typ)))
            }
            Step::Error(err) => {
                note_error(&mut self.summary, &mut self.finished, &self.config, &err);
                Some(Err(err))
            }
            Step::File(names, source) => {
                // Only `self.stack` may be borrowed past this point: the
                // stream lives as long as the returned record.
                let opened = match source {
                    Source::Path(path) => File::open(&path)
                        .map(EntryReader::new)
                        .map_err(|source| WalkError::Io {
                            names: names.clone(),
                            source,
                        }),
                    Source::Member(index) => {
                        self.stack
                            .open_member(index)
                            .map_err(|source| WalkError::MemberUnreadable {
                                names: names.clone(),
                                source,
                            })
                    }
                };
                match opened {
                    Ok(stream) => {
                        self.summary.record(FileType::File);
                        log::trace!("FILE {names}");
                        Some(Ok(WalkResult::file(names, stream)))
                    }
                    Err(err) => {
                        note_error(&mut self.summary, &mut self.finished, &self.config, &err);
                        Some(Err(err))
                    }
                }
            }
        }
    }

    /// Calls `f` with every remaining record.
    pub fn for_each_entry<F>(&mut self, mut f: F)
    where
        F: FnMut(std::result::Result<WalkResult<'_>, WalkError>),
    {
        while let Some(result) = self.next_entry() {
            f(result);
        }
    }

    /// Returns the counts of records and errors produced so far.
    #[must_use]
    pub const fn summary(&self) -> &WalkSummary {
        &self.summary
    }

    /// Returns the configuration of this walk.
    #[must_use]
    pub const fn config(&self) -> &WalkConfig {
        &self.config
    }

    fn advance(&mut self) -> Option<Step> {
        loop {
            if self.stack.len() > 0 {
                if let Some(step) = self.member_step() {
                    return Some(step);
                }
                continue;
            }

            if self.fs.is_none() {
                let root = self.roots.pop_front()?;
                self.fs = Some(FsWalk::new(root, &self.config));
            }
            if let Some(step) = self.fs_step() {
                return Some(step);
            }
        }
    }

    /// Takes the next member of the innermost container, popping the
    /// container once it is exhausted. `None` means nothing to report for
    /// this member.
    fn member_step(&mut self) -> Option<Step> {
        let frame = self.stack.top_mut()?;
        let Some((index, member)) = frame.advance() else {
            self.stack.pop();
            return None;
        };
        if frame.is_skipped(&member.name) {
            return None;
        }

        let names = frame.names().join(member.name.as_str());
        if !accepts(&mut self.filter, &names) {
            if member.kind == MemberKind::Directory {
                frame.skip_below(&member.name);
            }
            return None;
        }

        let mut typ = classify_member(&member);
        let mut format = detect_format(&member.name).filter(|_| typ == FileType::Archive);
        if should_sniff(typ, &member.name, self.config.sniff_content) {
            match self.stack.sniff_member(index) {
                Ok(Some(sniffed)) => {
                    typ = FileType::Archive;
                    format = Some(sniffed);
                }
                Ok(None) => {}
                Err(err) => log::debug!("cannot sniff {names}: {err}"),
            }
        }

        Some(self.classified(names, typ, format, Source::Member(index)))
    }

    /// Takes the next entry of the current filesystem walk, ending the walk
    /// once it is exhausted. `None` means nothing to report for this entry.
    fn fs_step(&mut self) -> Option<Step> {
        let fs = self.fs.as_mut()?;
        let entry = match fs.entries.next() {
            Some(Ok(entry)) => entry,
            Some(Err(err)) => {
                let path = err
                    .path()
                    .map_or_else(|| fs.root.clone(), Path::to_path_buf);
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop"));
                return Some(Step::Error(WalkError::Io {
                    names: PathTuple::new(path),
                    source,
                }));
            }
            None => {
                self.fs = None;
                return None;
            }
        };

        let names = PathTuple::new(entry.path());
        // A followed root still reports the link's own file type.
        let file_type = if entry.depth() == 0 && self.config.follow_root_links {
            match fs::metadata(entry.path()) {
                Ok(metadata) => metadata.file_type(),
                Err(source) => return Some(Step::Error(WalkError::Io { names, source })),
            }
        } else {
            entry.file_type()
        };
        if !accepts(&mut self.filter, &names) {
            if file_type.is_dir() {
                fs.entries.skip_current_dir();
            }
            return None;
        }

        let name = file_name(entry.path());
        let mut typ = classify_file_type(entry.path(), file_type);
        let mut format = detect_format(&name).filter(|_| typ == FileType::Archive);
        if should_sniff(typ, &name, self.config.sniff_content) {
            match File::open(entry.path()).and_then(|mut file| sniff_reader(&mut file)) {
                Ok(Some(sniffed)) => {
                    typ = FileType::Archive;
                    format = Some(sniffed);
                }
                Ok(None) => {}
                Err(err) => log::debug!("cannot sniff {names}: {err}"),
            }
        }

        Some(self.classified(names, typ, format, Source::Path(entry.into_path())))
    }

    fn classified(
        &mut self,
        names: PathTuple,
        typ: FileType,
        format: Option<ArchiveFormat>,
        source: Source,
    ) -> Step {
        match (typ, format) {
            (FileType::File, _) => Step::File(names, source),
            (FileType::Archive, Some(format)) => {
                self.pending = Some(Descend {
                    names: names.clone(),
                    format,
                    source,
                });
                Step::Node(names, typ)
            }
            (typ, _) => Step::Node(names, typ),
        }
    }

    /// Opens a container yielded by the previous call and pushes it.
    fn descend(&mut self, descend: Descend) -> Option<WalkError> {
        let Descend {
            names,
            format,
            source,
        } = descend;
        if !self.stack.registry().supports(format) {
            log::warn!("not descending into {names}: {format} support is disabled");
            return None;
        }

        let file = match source {
            Source::Path(path) => File::open(path).map_err(FormatError::from),
            Source::Member(index) => self.stack.spill_member(index),
        };
        let pushed = file.and_then(|file| self.stack.push(names.clone(), format, file));
        pushed
            .err()
            .map(|source| WalkError::ArchiveUnreadable { names, source })
    }

    fn shutdown(&mut self) {
        self.pending = None;
        self.fs = None;
        self.roots.clear();
        self.stack.clear();
    }
}

fn accepts(filter: &mut Option<Filter>, names: &PathTuple) -> bool {
    filter.as_mut().is_none_or(|filter| filter(names))
}

fn note_error(summary: &mut WalkSummary, finished: &mut bool, config: &WalkConfig, err: &WalkError) {
    summary.record_error();
    log::warn!("{err}");
    if config.fail_fast {
        *finished = true;
    }
}

fn check_root(root: &Path, follow_links: bool) -> io::Result<()> {
    let metadata = if follow_links {
        fs::metadata(root)?
    } else {
        fs::symlink_metadata(root)?
    };
    if metadata.is_dir() {
        fs::read_dir(root)?;
    } else if metadata.is_file() {
        File::open(root)?;
    }
    Ok(())
}

/// Builder for a [`Walker`] over one or more roots.
///
/// # Examples
///
/// ```no_run
/// use nestwalk_core::WalkBuilder;
/// use nestwalk_core::WalkConfig;
///
/// # fn main() -> Result<(), nestwalk_core::WalkError> {
/// let mut walker = WalkBuilder::new()
///     .root("incoming")
///     .root("archive.tar.gz")
///     .config(WalkConfig {
///         sort_dirs: true,
///         ..Default::default()
///     })
///     .filter(|names| !names.last_name().ends_with(".bak"))
///     .build()?;
/// while let Some(result) = walker.next_entry() {
///     println!("{}", result?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct WalkBuilder {
    roots: Vec<PathBuf>,
    config: WalkConfig,
    filter: Option<Filter>,
}

impl WalkBuilder {
    /// Creates a builder with no roots and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root. Roots are walked in the order they were added.
    #[must_use]
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.roots.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets the walk configuration.
    #[must_use]
    pub fn config(mut self, config: WalkConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a filter. Nodes for which it returns `false` are neither
    /// reported nor descended into.
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: FnMut(&PathTuple) -> bool + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Validates every root and creates the walker.
    ///
    /// A builder without roots produces an empty walk.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::RootNotFound`] or [`WalkError::RootUnreadable`]
    /// for the first root whose metadata cannot be read, or that is a
    /// directory that cannot be listed or a file that cannot be opened.
    pub fn build(self) -> Result<Walker> {
        for root in &self.roots {
            check_root(root, self.config.follow_root_links)
                .map_err(|source| WalkError::root(root.clone(), source))?;
        }

        let registry = AdapterRegistry::new(self.config.capabilities());
        Ok(Walker {
            roots: self.roots.into(),
            config: self.config,
            filter: self.filter,
            fs: None,
            stack: ResourceStack::new(registry),
            pending: None,
            summary: WalkSummary::new(),
            finished: false,
        })
    }
}
