//! Terminal rendering of the post lists.

pub mod pending;
pub mod views;

pub use pending::PendingViews;
