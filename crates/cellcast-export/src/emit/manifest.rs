use cellcast_common::Value;
use serde::Serialize;
use std::path::Path;

use super::write_atomic;
use crate::error::ExportError;
use crate::record::Record;

/// One entry per written record, consumed by code generators that emit
/// typed readers for the exported files.
#[derive(Debug, Serialize)]
pub struct ManifestEntry<'a> {
    pub exportfile: String,
    pub root: &'a str,
    pub item: &'a str,
    pub schema: &'a Value,
}

impl<'a> From<&'a Record> for ManifestEntry<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            exportfile: record.export_file.to_string_lossy().into_owned(),
            root: &record.root,
            item: record.item_or_mark(),
            schema: &record.schema,
        }
    }
}

pub fn render_manifest<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<String, ExportError> {
    let entries: Vec<ManifestEntry<'_>> = records.into_iter().map(ManifestEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Nothing is written when no record produced output.
pub fn write_manifest<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<bool, ExportError> {
    let records: Vec<&Record> = records.into_iter().collect();
    if records.is_empty() {
        return Ok(false);
    }
    write_atomic(path, &render_manifest(records)?)?;
    Ok(true)
}
