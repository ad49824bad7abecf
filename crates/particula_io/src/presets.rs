//! Named preset library: a directory of `*.json` configuration documents.

use crate::config_file::{parse_config, ConfigFormat};
use crate::error::{IoError, Result};
use particula_core::SimConfig;
use std::path::{Path, PathBuf};

pub struct PresetLibrary {
    dir: PathBuf,
}

impl PresetLibrary {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Preset names (file stems), sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("listing presets in {:?}", self.dir))
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if !is_json || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads and validates the preset called `name`.
    pub fn load(&self, name: &str) -> Result<SimConfig> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(IoError::validation(format!("invalid preset name `{}`", name)));
        }
        let path = self.dir.join(format!("{}.json", name));
        if !path.is_file() {
            return Err(IoError::not_found(format!("preset `{}`", name)));
        }
        let content = std::fs::read_to_string(&path)?;
        let config = parse_config(&content, ConfigFormat::Json)
            .map_err(|e| e.with_context(format!("loading preset `{}`", name)))?;
        tracing::info!(preset = name, "Preset loaded");
        Ok(config)
    }
}
