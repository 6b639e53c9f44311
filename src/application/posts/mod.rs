mod commands;
mod queries;
mod service;
mod store;
pub mod types;

pub use service::*;
pub use store::PostStore;
pub use types::{
    CreatePostCommand, NoopInvalidator, PostServiceError, View, ViewInvalidator,
};
