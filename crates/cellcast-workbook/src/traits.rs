use cellcast_common::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Raw contents of one worksheet. Coordinates are 0-based `(row, col)`;
/// cells that are absent read as [`CellValue::Empty`].
#[derive(Clone, Debug, Default)]
pub struct SheetData {
    pub cells: BTreeMap<(u32, u32), CellValue>,
    /// `(rows, cols)` of the used area, counted from `(0, 0)`.
    pub dimensions: Option<(u32, u32)>,
    pub merged_cells: Vec<MergedRange>,
}

/// Merged block of cells, 0-based and half-open on both axes: the anchor is
/// `(start_row, start_col)` and the block covers rows `start_row..end_row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergedRange {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row < self.end_row && col >= self.start_col && col < self.end_col
    }

    pub fn height(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row)
    }

    pub fn width(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col)
    }
}

pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_range_is_half_open() {
        let m = MergedRange::new(1, 2, 3, 4);
        assert!(m.contains(1, 2));
        assert!(m.contains(2, 3));
        assert!(!m.contains(3, 3));
        assert!(!m.contains(2, 4));
        assert_eq!((m.height(), m.width()), (2, 2));
    }
}
