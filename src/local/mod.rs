//! Browser-local state: key-value abstraction and the session store.
//!
//! The browser's persistent local storage is modeled as an injected
//! [`KeyValueStore`] so tests can substitute an in-memory fake or a
//! broken store instead of a real browser environment.

pub mod key_value;
pub mod session;

pub use key_value::{KeyValueStore, MemoryKeyValueStore};
pub use session::SessionStore;
