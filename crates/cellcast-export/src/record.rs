use cellcast_common::Value;
use std::path::PathBuf;

/// One export unit: a sheet, or a group of sheets opened with `<<`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub path: PathBuf,
    pub sheet: String,
    pub export_file: PathBuf,
    pub root: String,
    /// Row name for item sheets outside a group; `None` for config sheets
    /// and groups.
    pub item: Option<String>,
    pub export_mark: String,
    pub schema: Value,
    pub data: Value,
}

impl Record {
    /// Name written to the manifest `item` slot.
    pub fn item_or_mark(&self) -> &str {
        self.item.as_deref().unwrap_or(&self.export_mark)
    }
}
