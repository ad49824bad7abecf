//! Loading and saving configuration documents.
//!
//! The format follows the extension: `.toml` files use TOML, everything else
//! is read and written as JSON.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, from_toml, write_json_file};
use particula_core::SimConfig;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) => Err(IoError::UnsupportedFormat(ext.to_string())),
            None => Ok(Self::Json),
        }
    }
}

/// Parses and validates a configuration document. Noise parameters are
/// clamped into range.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<SimConfig> {
    let config: SimConfig = match format {
        ConfigFormat::Json => from_json(content)?,
        ConfigFormat::Toml => from_toml(content)?,
    };
    config.validate()?;
    Ok(config.normalized())
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading config from {:?}", path))
    })?;
    let config =
        parse_config(&content, format).map_err(|e| e.with_context(format!("{:?}", path)))?;
    tracing::info!(path = ?path, fingerprint = %config.fingerprint(), "Configuration loaded");
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &SimConfig) -> Result<()> {
    let path = path.as_ref();
    match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => write_json_file(config, path)?,
        ConfigFormat::Toml => {
            let content = toml::to_string_pretty(config).map_err(|e| {
                IoError::serialization(format!("TOML serialization failed: {}", e))
            })?;
            std::fs::write(path, content).map_err(|e| {
                IoError::FileSystem(e).with_context(format!("writing config to {:?}", path))
            })?;
        }
    }
    tracing::debug!(path = ?path, "Configuration saved");
    Ok(())
}
