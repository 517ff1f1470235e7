//! Walk summary counters.

use crate::types::FileType;

/// Counts of what a walk has produced so far.
///
/// The walker keeps one up to date as records are yielded; see
/// [`Walker::summary`](crate::Walker::summary).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Number of `FILE` records.
    pub files: usize,

    /// Number of `DIR` records.
    pub dirs: usize,

    /// Number of `ARCHIVE` records.
    pub archives: usize,

    /// Number of `SYMLINK` records.
    pub symlinks: usize,

    /// Number of `OTHER` records.
    pub others: usize,

    /// Number of node-scoped errors.
    pub errors: usize,
}

impl WalkSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one record of type `typ`.
    pub fn record(&mut self, typ: FileType) {
        let counter = match typ {
            FileType::File => &mut self.files,
            FileType::Dir => &mut self.dirs,
            FileType::Archive => &mut self.archives,
            FileType::Symlink => &mut self.symlinks,
            FileType::Other => &mut self.others,
        };
        *counter += 1;
    }

    /// Counts one error.
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Returns whether any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Returns the total number of records, errors excluded.
    #[must_use]
    pub fn total(&self) -> usize {
        self.files + self.dirs + self.archives + self.symlinks + self.others
    }
}
