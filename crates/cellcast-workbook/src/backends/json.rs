use crate::IoError;
use crate::traits::{MergedRange, SheetData, SpreadsheetReader};
use cellcast_common::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Row-major workbook document:
///
/// ```json
/// {"sheets": [{"name": "Item|item", "rows": [["id", "name"]], "merged_cells": []}]}
/// ```
///
/// Cells are plain JSON scalars; `null` and `""` are empty.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonWorkbook {
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    merged_cells: Vec<MergedRange>,
}

#[derive(Debug, Default)]
pub struct JsonAdapter {
    data: JsonWorkbook,
    path: Option<PathBuf>,
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn to_sheet_data(js: &JsonSheet) -> SheetData {
        let mut cells = BTreeMap::new();
        let mut width = 0u32;
        for (r, row) in js.rows.iter().enumerate() {
            width = width.max(row.len() as u32);
            for (c, raw) in row.iter().enumerate() {
                let value = json_to_cell(raw);
                if value != CellValue::Empty {
                    cells.insert((r as u32, c as u32), value);
                }
            }
        }
        let height = js.rows.len() as u32;
        SheetData {
            cells,
            dimensions: (height > 0).then_some((height, width)),
            merged_cells: js.merged_cells.clone(),
        }
    }
}

fn json_to_cell(raw: &serde_json::Value) -> CellValue {
    match raw {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => CellValue::from(s.as_str()),
        other => CellValue::Text(other.to_string()),
    }
}

impl SpreadsheetReader for JsonAdapter {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.data.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let data: JsonWorkbook = serde_json::from_reader(reader)?;
        Ok(JsonAdapter {
            data,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    fn open_bytes(bytes: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let data: JsonWorkbook = serde_json::from_slice(&bytes)?;
        Ok(JsonAdapter { data, path: None })
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        self.data
            .sheets
            .iter()
            .find(|s| s.name == sheet)
            .map(Self::to_sheet_data)
            .ok_or_else(|| IoError::SheetNotFound(sheet.to_string()))
    }
}
