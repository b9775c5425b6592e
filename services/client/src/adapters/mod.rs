pub mod backend;
pub mod file_storage;
pub mod memory_storage;

pub use backend::HttpBackendAdapter;
pub use file_storage::{FileSessionStorage, SESSION_STORAGE_KEY};
pub use memory_storage::MemorySessionStorage;
