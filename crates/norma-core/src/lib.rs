//! Shared foundation for the Norma direct-action engine.
//!
//! Provides the workspace-wide error type, timestamp newtype, TOML
//! configuration, and tracing initialization used by the store and
//! engine crates.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::NormaConfig;
pub use error::{NormaError, Result};
pub use types::Timestamp;
