//! I/O utilities shared by the adapters and the walker.

pub mod reader;
pub mod spill;

pub use reader::EntryReader;
pub use spill::CopyBuffer;
pub use spill::copy_with_buffer;
pub use spill::spill;
