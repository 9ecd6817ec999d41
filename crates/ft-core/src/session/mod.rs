//! Authentication session
//!
//! The session is an explicit value rather than global state: the CLI
//! restores it from client-local storage at startup, hands it to the API
//! client, and clears it (memory and storage) on logout.
//!
//! # Example
//!
//! ```ignore
//! use ft_core::session::Session;
//! use ft_storage::FileSystemStore;
//!
//! let store = FileSystemStore::default_location()?;
//! let mut session = Session::init_from_storage(&store)?;
//! if session.is_authenticated() {
//!     session.logout(&store)?;
//! }
//! ```

mod model;
mod store;

pub use model::{Session, Usuario, TOKEN_KEY, USER_KEY};
pub use store::memory::MemoryStore;
pub use store::KeyValueStore;
