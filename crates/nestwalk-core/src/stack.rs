//! The chain of open containers along the active traversal path.
//!
//! Frame `n + 1` was opened from a member of frame `n`, but owns its own
//! backing storage (a temporary file the member was spilled into), so
//! frames can be dropped in any order without dangling. The walker still
//! only ever pops the innermost one.

use std::fs::File;

use crate::classify::sniff_reader;
use crate::error::FormatError;
use crate::formats::AdapterRegistry;
use crate::formats::ArchiveAdapter;
use crate::formats::ArchiveFormat;
use crate::formats::Container;
use crate::formats::Member;
use crate::io::CopyBuffer;
use crate::io::EntryReader;
use crate::io::spill;
use crate::types::PathTuple;

/// One open container and the traversal cursor over its members.
pub(crate) struct Frame {
    names: PathTuple,
    container: Container,
    next: usize,
    /// Member name prefixes of directories the filter rejected.
    skipped: Vec<String>,
}

impl Frame {
    pub(crate) fn names(&self) -> &PathTuple {
        &self.names
    }

    /// Advances the cursor, returning the next member and its index.
    pub(crate) fn advance(&mut self) -> Option<(usize, Member)> {
        let index = self.next;
        let member = self.container.members().get(index)?.clone();
        self.next += 1;
        Some((index, member))
    }

    /// Excludes every later member below directory member `name`.
    pub(crate) fn skip_below(&mut self, name: &str) {
        let mut prefix = name.to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.skipped.push(prefix);
    }

    pub(crate) fn is_skipped(&self, name: &str) -> bool {
        self.skipped.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Stack of open containers, innermost last.
pub(crate) struct ResourceStack {
    frames: Vec<Frame>,
    registry: AdapterRegistry,
    buffer: CopyBuffer,
}

impl ResourceStack {
    pub(crate) fn new(registry: AdapterRegistry) -> Self {
        Self {
            frames: Vec::new(),
            registry,
            buffer: CopyBuffer::new(),
        }
    }

    pub(crate) const fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Opens `file` as a container of `format` and makes it the innermost
    /// frame.
    pub(crate) fn push(
        &mut self,
        names: PathTuple,
        format: ArchiveFormat,
        file: File,
    ) -> Result<(), FormatError> {
        let container = self
            .registry
            .open(format, file, &names.last_name(), &mut self.buffer)?;
        log::debug!("push [{}] {names}", self.frames.len());
        self.frames.push(Frame {
            names,
            container,
            next: 0,
            skipped: Vec::new(),
        });
        Ok(())
    }

    /// Closes the innermost container.
    pub(crate) fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            log::debug!("pop [{}] {}", self.frames.len(), frame.names);
        }
    }

    /// Closes every container, innermost first.
    pub(crate) fn clear(&mut self) {
        while !self.frames.is_empty() {
            self.pop();
        }
    }

    fn top_container(&mut self) -> Result<&mut Container, FormatError> {
        self.frames
            .last_mut()
            .map(|frame| &mut frame.container)
            .ok_or(FormatError::NotAContainer)
    }

    /// Opens member `index` of the innermost container.
    pub(crate) fn open_member(&mut self, index: usize) -> Result<EntryReader<'_>, FormatError> {
        self.top_container()?.open_member(index)
    }

    /// Copies member `index` of the innermost container into a temporary
    /// file, for containers that need random access.
    pub(crate) fn spill_member(&mut self, index: usize) -> Result<File, FormatError> {
        let frame = self.frames.last_mut().ok_or(FormatError::NotAContainer)?;
        let mut reader = frame.container.open_member(index)?;
        Ok(spill(&mut reader, &mut self.buffer)?)
    }

    /// Sniffs the leading bytes of member `index` of the innermost
    /// container.
    pub(crate) fn sniff_member(&mut self, index: usize) -> Result<Option<ArchiveFormat>, FormatError> {
        let mut reader = self.open_member(index)?;
        Ok(sniff_reader(&mut reader)?)
    }
}

impl Drop for ResourceStack {
    fn drop(&mut self) {
        self.clear();
    }
}
