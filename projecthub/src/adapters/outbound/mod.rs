mod file_store;
mod memory_store;
mod store_repository;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use store_repository::{keys, StoreRepository};
