#![cfg(feature = "calamine")]

use crate::IoError;
use crate::traits::{MergedRange, SheetData, SpreadsheetReader};
use cellcast_common::CellValue;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx};

/// `.xlsx`/`.xlsm` reader. The whole file is buffered so paths and byte
/// slices share one code path.
pub struct CalamineAdapter {
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl CalamineAdapter {
    fn convert_value(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Boolean(*b),
            // Serial number; cells are re-parsed by their declared column type.
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }

    fn range_to_cells(range: &Range<Data>) -> BTreeMap<(u32, u32), CellValue> {
        let mut cells = BTreeMap::new();
        let (start_row, start_col) = range.start().unwrap_or_default();

        for (row, col, val) in range.used_cells() {
            let value = Self::convert_value(val);
            if value != CellValue::Empty {
                cells.insert((start_row + row as u32, start_col + col as u32), value);
            }
        }
        cells
    }
}

impl SpreadsheetReader for CalamineAdapter {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.sheet_names().to_vec())
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open_bytes(bytes)
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(data)).map_err(|e| IoError::from_backend("calamine", e))?;
        workbook
            .load_merged_regions()
            .map_err(|e| IoError::from_backend("calamine", e))?;
        Ok(Self { workbook })
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("read_sheet", backend = "calamine", sheet).entered();

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| IoError::from_backend("calamine", e))?;
        let cells = Self::range_to_cells(&range);

        // calamine dimensions are inclusive
        let merged_cells: Vec<MergedRange> = self
            .workbook
            .merged_regions_by_sheet(sheet)
            .into_iter()
            .map(|(_, _, dims)| {
                MergedRange::new(dims.start.0, dims.start.1, dims.end.0 + 1, dims.end.1 + 1)
            })
            .collect();

        let dimensions = range.end().map(|(r, c)| (r + 1, c + 1));

        Ok(SheetData {
            cells,
            dimensions,
            merged_cells,
        })
    }
}
