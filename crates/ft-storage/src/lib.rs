//! ft-storage - Storage library for fiscal-tracker
//!
//! This crate provides the persistent client-local key/value store that
//! holds the authentication token and user profile between runs.

mod kv_store;

pub use kv_store::{default_base_dir, FileSystemStore};
