//! Document store layer for Norma.
//!
//! Exposes the store-agnostic `DocumentStore` trait consumed by the action
//! engine, an in-memory implementation for tests and embedded use, and a
//! SQLite-backed implementation for durable deployments.

pub mod db;
pub mod document;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use db::Database;
pub use document::{Document, DocumentStore};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
