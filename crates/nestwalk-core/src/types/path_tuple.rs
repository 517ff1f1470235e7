//! Lineage of a node across the filesystem and nested archives.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Ordered, non-empty chain of path components identifying one node.
///
/// The first component is a real filesystem path. Every further component
/// is a member name inside the container identified by the components
/// before it, stored exactly as the container records it (forward-slash
/// separated, no normalization). Equality is exact and case-sensitive.
///
/// The number of components is the nesting depth plus one.
///
/// # Examples
///
/// ```
/// use nestwalk_core::PathTuple;
///
/// let names = PathTuple::new("archive.tar.gz")
///     .join("archive/abc.zip")
///     .join("abc.txt");
///
/// assert_eq!(names.len(), 3);
/// assert_eq!(names.depth(), 2);
/// assert_eq!(names.last_name(), "abc.txt");
/// assert_eq!(names.to_string(), "archive.tar.gz/archive/abc.zip/abc.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathTuple {
    root: PathBuf,
    members: Vec<String>,
}

impl PathTuple {
    /// Creates a tuple for a real filesystem path.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            members: Vec::new(),
        }
    }

    /// Returns a new tuple with `member` appended.
    #[must_use]
    pub fn join<S: Into<String>>(&self, member: S) -> Self {
        let mut members = Vec::with_capacity(self.members.len() + 1);
        members.extend(self.members.iter().cloned());
        members.push(member.into());
        Self {
            root: self.root.clone(),
            members,
        }
    }

    /// Returns the real filesystem component.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the archive-internal components, outermost first.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len() + 1
    }

    /// Always `false`; a tuple has at least its filesystem component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns how many containers enclose this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.members.len()
    }

    /// Returns the tuple with its last component removed, or `None` for a
    /// filesystem-level node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.members.split_last()?;
        Some(Self {
            root: self.root.clone(),
            members: rest.to_vec(),
        })
    }

    /// Returns the last component as text.
    ///
    /// Filesystem components are converted lossily.
    #[must_use]
    pub fn last_name(&self) -> Cow<'_, str> {
        self.members.last().map_or_else(
            || self.root.to_string_lossy(),
            |member| Cow::Borrowed(member.as_str()),
        )
    }
}

impl fmt::Display for PathTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())?;
        for member in &self.members {
            write!(f, "/{member}")?;
        }
        Ok(())
    }
}

impl From<&Path> for PathTuple {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for PathTuple {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}
