mod error;
mod memstore;
mod slot;
mod store;

pub use error::StoreError;
pub use memstore::MemoryStore;
pub use slot::Slot;
pub use store::Store;
