//! Storage domain - Record store abstraction over API key records

mod backend;
mod repository;

pub use backend::StoreBackend;
pub use repository::RecordStore;

#[cfg(test)]
pub use repository::mock;
