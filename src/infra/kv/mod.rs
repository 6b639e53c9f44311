//! Key-value backends behind [`crate::application::repos::KvStore`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
