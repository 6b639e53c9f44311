//! Application services orchestrating domain logic over the key-value store.

pub mod blog;
pub mod credentials;
pub mod error;
pub mod posts;
pub mod repos;
pub mod session;
