//! Snapshot export.

use crate::error::Result;
use crate::serialization::{read_json_file, write_json_file};
use particula_core::{SimConfig, SimSnapshot};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A snapshot tagged with the configuration that produced it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotExport {
    pub fingerprint: String,
    pub config: SimConfig,
    pub snapshot: SimSnapshot,
}

impl SnapshotExport {
    #[must_use]
    pub fn new(config: SimConfig, snapshot: SimSnapshot) -> Self {
        Self {
            fingerprint: config.fingerprint(),
            config,
            snapshot,
        }
    }
}

pub fn write_snapshot<P: AsRef<Path>>(
    path: P,
    config: &SimConfig,
    snapshot: &SimSnapshot,
) -> Result<()> {
    let export = SnapshotExport::new(config.clone(), snapshot.clone());
    write_json_file(&export, &path)?;
    tracing::info!(
        path = ?path.as_ref(),
        tick = snapshot.tick,
        particles = snapshot.len(),
        "Snapshot written"
    );
    Ok(())
}

pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<SnapshotExport> {
    let export: SnapshotExport = read_json_file(path)?;
    export.config.validate()?;
    Ok(export)
}
