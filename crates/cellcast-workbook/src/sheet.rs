use crate::traits::{MergedRange, SheetData};
use cellcast_common::{CellValue, EMPTY_CELL};

/// A worksheet with merged-cell resolution.
///
/// Every read goes through the merged-region table: a coordinate inside a
/// region returns the anchor's value, and [`Sheet::cell_size`] reports the
/// region's extent.
#[derive(Clone, Debug)]
pub struct Sheet {
    name: String,
    data: SheetData,
}

impl Sheet {
    pub fn new(name: impl Into<String>, data: SheetData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build a sheet from row-major literals; handy for tests.
    pub fn from_rows(
        name: impl Into<String>,
        rows: Vec<Vec<CellValue>>,
        merged_cells: Vec<MergedRange>,
    ) -> Self {
        let mut data = SheetData {
            merged_cells,
            ..SheetData::default()
        };
        let mut width = 0u32;
        for (r, row) in rows.iter().enumerate() {
            width = width.max(row.len() as u32);
            for (c, value) in row.iter().enumerate() {
                if *value != CellValue::Empty {
                    data.cells.insert((r as u32, c as u32), value.clone());
                }
            }
        }
        if !rows.is_empty() {
            data.dimensions = Some((rows.len() as u32, width));
        }
        Self::new(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &SheetData {
        &self.data
    }

    /// Rows spanned by data or merged regions.
    pub fn row_count(&self) -> u32 {
        let rows = self.data.dimensions.map(|(r, _)| r).unwrap_or(0);
        self.data
            .merged_cells
            .iter()
            .map(|m| m.end_row)
            .fold(rows, u32::max)
    }

    /// Columns spanned by data or merged regions.
    pub fn col_count(&self) -> u32 {
        let cols = self.data.dimensions.map(|(_, c)| c).unwrap_or(0);
        self.data
            .merged_cells
            .iter()
            .map(|m| m.end_col)
            .fold(cols, u32::max)
    }

    pub fn merged_region(&self, row: u32, col: u32) -> Option<&MergedRange> {
        self.data.merged_cells.iter().find(|m| m.contains(row, col))
    }

    /// Value at `(row, col)`, resolved to the anchor of its merged region.
    pub fn cell_value(&self, row: u32, col: u32) -> &CellValue {
        let (row, col) = match self.merged_region(row, col) {
            Some(m) => (m.start_row, m.start_col),
            None => (row, col),
        };
        self.data.cells.get(&(row, col)).unwrap_or(&EMPTY_CELL)
    }

    pub fn cell_text(&self, row: u32, col: u32) -> String {
        self.cell_value(row, col).to_text()
    }

    /// `(height, width)` of the cell at `(row, col)`; `(1, 1)` unless merged.
    pub fn cell_size(&self, row: u32, col: u32) -> (u32, u32) {
        match self.merged_region(row, col) {
            Some(m) => (m.height().max(1), m.width().max(1)),
            None => (1, 1),
        }
    }
}
