//! `SQLite` persistence substrate for Jotdown

mod connection;
mod kv_repository;
mod migrations;

pub use connection::Database;
pub use kv_repository::SqliteStore;
