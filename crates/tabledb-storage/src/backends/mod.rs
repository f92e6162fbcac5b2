//! Concrete store backend implementations.

mod memory;
mod redb;

pub use memory::MemoryStore;
pub use redb::RedbStore;
