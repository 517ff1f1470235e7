//! Recursive walking of directory trees and the archives inside them.
//!
//! `nestwalk-core` enumerates a filesystem tree and transparently descends
//! into every archive or compressed file it finds (zip, tar, compressed
//! tar, gzip, bzip2, xz, zstd, and 7z with the `sevenz` feature), at any
//! nesting depth. Each node is reported once with its full lineage, its
//! type, and for files an open content stream. Nothing is extracted to
//! disk and no archive is loaded fully into memory.
//!
//! # Examples
//!
//! ```no_run
//! use nestwalk_core::FileType;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut walker = nestwalk_core::walk("archive.tar.gz")?;
//! while let Some(result) = walker.next_entry() {
//!     let mut result = result?;
//!     match result.typ() {
//!         FileType::File => {
//!             let content = result.read_to_end()?.unwrap_or_default();
//!             println!("{}: {} bytes", result.names(), content.len());
//!         }
//!         typ => println!("{}: {typ}", result.names()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod formats;
pub mod io;
mod stack;
pub mod summary;
pub mod types;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main API types
pub use api::open_path;
pub use api::walk;
pub use config::Capabilities;
pub use config::WalkConfig;
pub use error::FormatError;
pub use error::Result;
pub use error::WalkError;
pub use io::EntryReader;
pub use summary::WalkSummary;
pub use types::FileType;
pub use types::PathTuple;
pub use walker::WalkBuilder;
pub use walker::WalkResult;
pub use walker::Walker;
