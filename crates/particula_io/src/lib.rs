//! # Particula IO
//!
//! File-facing layer for the Particula simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON and TOML helpers
//! - Configuration files and the named preset library
//! - Snapshot export

/// Configuration documents on disk
pub mod config_file;
/// Error types and result aliases for I/O operations
pub mod error;
/// Snapshot export tagged with the config fingerprint
pub mod export;
/// Directory-backed preset library
pub mod presets;
/// Validated serialization helpers for JSON and TOML
pub mod serialization;

pub use config_file::{load_config, save_config};
pub use error::{IoError, Result};
pub use export::{read_snapshot, write_snapshot, SnapshotExport};
pub use presets::PresetLibrary;
pub use serialization::{
    from_json, from_toml, read_json_file, to_json, to_json_pretty, write_json_file,
};
