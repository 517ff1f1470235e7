//! Value types shared by the classifier, the adapters, and the walker.
//!
//! - [`PathTuple`]: lineage of a node from the filesystem through nested
//!   containers
//! - [`FileType`]: classified type of a node

pub mod file_type;
pub mod path_tuple;

pub use file_type::FileType;
pub use path_tuple::PathTuple;
