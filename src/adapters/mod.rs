//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits in [`crate::ports`]:
//! checkpoint storage and the background save task.

pub mod background;
pub mod in_memory_repository;
pub mod msgpack_repository;

pub use background::{SaveHandle, save_in_background};
pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
