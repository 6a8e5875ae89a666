use cellcast_common::{Fields, Value};
use cellcast_parse::parse_type;
use cellcast_workbook::Sheet;
use tracing::debug;

use super::{Extracted, MAX_BLANK_ROWS, SheetContext};
use crate::builder::{Parent, RecordBuilder};
use crate::error::{BuildError, ExportError};

/// Header positions of a key/value sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigColumns {
    pub name: u32,
    pub value: u32,
    pub ty: u32,
    pub sign: Option<u32>,
    pub description: Option<u32>,
}

/// A sheet is a config sheet when row 0 names `name`, `value` and `type`
/// columns.
pub fn detect_config_columns(sheet: &Sheet) -> Option<ConfigColumns> {
    let find = |title: &str| (0..sheet.col_count()).find(|&c| sheet.cell_text(0, c).trim() == title);
    Some(ConfigColumns {
        name: find("name")?,
        value: find("value")?,
        ty: find("type")?,
        sign: find("sign"),
        description: find("description"),
    })
}

pub fn extract_config_sheet(
    ctx: &SheetContext<'_>,
    builder: &mut RecordBuilder<'_>,
    columns: ConfigColumns,
) -> Result<Extracted, ExportError> {
    let sheet = ctx.sheet;
    let mut schema = Fields::new();
    let mut data = Fields::new();
    let mut blank_rows = 0;

    for row in 1..sheet.row_count() {
        if let Some(col) = columns.sign {
            let sign = sheet.cell_text(row, col);
            if !ctx.signs.matches(sign.trim()) {
                debug!(sheet = sheet.name(), row = row + 1, "row filtered by sign");
                continue;
            }
        }

        let name = sheet.cell_text(row, columns.name);
        let name = name.trim();
        let value = sheet.cell_text(row, columns.value);
        let ty = sheet.cell_text(row, columns.ty);
        let ty = ty.trim();

        if name.is_empty() && value.is_empty() && ty.is_empty() {
            blank_rows += 1;
            if blank_rows >= MAX_BLANK_ROWS {
                break;
            }
            continue;
        }
        if name.is_empty() || ty.is_empty() {
            continue;
        }
        blank_rows = 0;
        if name.starts_with('#') {
            continue;
        }

        let location = ctx.location.at(row, columns.value);
        let wrap = |e: BuildError| ExportError::at(location.clone(), e);
        let descriptor = parse_type(ty).map_err(|e| wrap(e.into()))?;

        if ctx.with_schema {
            let description = columns
                .description
                .map(|c| sheet.cell_text(row, c).trim().to_string());
            builder
                .schema(
                    Parent::Object(&mut schema),
                    &descriptor,
                    name,
                    description.as_deref(),
                )
                .map_err(wrap)?;
        }
        if !value.is_empty() {
            builder
                .data(Parent::Object(&mut data), &descriptor, name, &value, &location)
                .map_err(wrap)?;
        }
    }

    Ok(Extracted {
        schema,
        data: Value::Object(data),
    })
}
