//! # linkshelf-store
//!
//! Durable storage behind the Linkshelf service, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for links, caller
//! accounts (roles) and user profiles.

pub mod accounts;
pub mod database;
pub mod links;
pub mod migrations;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
