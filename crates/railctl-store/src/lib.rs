//! Decision persistence: the store contract, its memory and file backends,
//! and feed queries.

pub mod error;
pub mod file;
pub mod lockfile;
pub mod memory;
pub mod query;
pub mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{open_store, DecisionStore};
