//! API key operations over the configured storage backend

mod service;

pub use service::KeyStore;
