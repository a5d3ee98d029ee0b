//! Storage infrastructure - Record store implementations

mod factory;
mod file;
mod remote;
mod seed;

pub use factory::{StoreFactory, StoreSelector};
pub use file::FileStore;
pub use remote::{RemoteStore, API_KEYS_TABLE};
pub use seed::generate_seed_records;
