//! Output persistence for heat bundles and run reports.
//!
//! The bundle goes to disk as pretty JSON; run reports append to a CSV log,
//! one row per generation.

use anyhow::Result;
use tracing::debug;

use crate::heat::types::{HeatBundle, RunReport};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Writes the full bundle as pretty-printed JSON.
pub fn write_json(path: &str, bundle: &HeatBundle) -> Result<()> {
    let json = serde_json::to_string_pretty(bundle)?;
    std::fs::write(path, json)?;
    debug!(path, "Bundle JSON written");
    Ok(())
}

/// Appends a [`RunReport`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_report(path: &str, report: &RunReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending run report");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(report)?;
    writer.flush()?;

    Ok(())
}
