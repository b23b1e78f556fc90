//! File System Abstraction
//!
//! Path-typed access to the disk. Generators never touch `std::fs` directly:
//! they go through these traits so that the whole pipeline can run against
//! the in-memory `testing::MockFileSystem`.

pub mod src;
pub mod testing;

pub use src::*;
