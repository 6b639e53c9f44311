//! Folio: a single-author blog kept in a local key-value store.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
