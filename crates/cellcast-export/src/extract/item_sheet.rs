use cellcast_common::{Fields, Key, Value};
use cellcast_parse::{FieldDecl, TypeDescriptor, parse_type};
use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{Extracted, MAX_BLANK_ROWS, SheetContext};
use crate::builder::{Parent, RecordBuilder, convert_scalar, fill};
use crate::error::{BuildError, ExportError};

const DESCRIPTION_ROW: u32 = 0;
const TYPE_ROW: u32 = 1;
const NAME_ROW: u32 = 2;
const SIGN_ROW: u32 = 3;
const FIRST_DATA_ROW: u32 = 4;

/// An exported header column. `width` is the merged width of its sign cell.
struct Column {
    index: u32,
    width: u32,
    token: String,
    ty: TypeDescriptor,
    name: String,
}

/// Extract a row-per-entity sheet. With `map_level`, rows are keyed by the
/// values of the first `map_level` exported columns instead of being listed.
pub fn extract_item_sheet(
    ctx: &SheetContext<'_>,
    builder: &mut RecordBuilder<'_>,
    map_level: Option<usize>,
) -> Result<Extracted, ExportError> {
    let mut schema = Fields::new();
    let columns = read_header(ctx, builder, &mut schema)?;

    let mut list = Vec::new();
    let mut keyed = Fields::new();
    let data = |list: Vec<Value>, keyed: Fields| match map_level {
        Some(_) => Value::Object(keyed),
        None => Value::List(list),
    };
    if columns.is_empty() {
        debug!(sheet = ctx.sheet.name(), "no exported columns");
        return Ok(Extracted {
            schema,
            data: data(list, keyed),
        });
    }

    let sheet = ctx.sheet;
    let key_columns = &columns[..map_level.unwrap_or(0).min(columns.len())];
    let mut blank_rows = 0;
    let mut row = FIRST_DATA_ROW;
    while row < sheet.row_count() {
        let (height, _) = sheet.cell_size(row, 0);
        let current = row;
        row += height;

        let first = sheet.cell_text(current, 0);
        let first = first.trim();
        if first.is_empty() {
            blank_rows += 1;
            if blank_rows >= MAX_BLANK_ROWS {
                break;
            }
            continue;
        }
        if first.starts_with('#') {
            continue;
        }
        blank_rows = 0;

        let mut strip = None;
        if let Some(token) = sign_prefix(first) {
            if !ctx.signs.matches(token.trim()) {
                debug!(sheet = sheet.name(), row = current + 1, "row filtered by sign");
                continue;
            }
            strip = Some(token.chars().count() + 2);
        }

        let mut item = Fields::new();
        for column in &columns {
            let location = ctx.location.at(current, column.index);
            let wrap = |e: BuildError| ExportError::at(location.clone(), e);

            if column.width > 1 {
                if let TypeDescriptor::Map = column.ty {
                    let sub = build_map_cell(ctx, builder, column, current, height)?;
                    if !sub.is_empty() {
                        fill(Parent::Object(&mut item), &column.name, Value::Object(sub), false)
                            .map_err(wrap)?;
                    }
                    continue;
                }
            }

            let mut raw = match (&column.ty, column.width > 1) {
                (TypeDescriptor::Object(fields), true) => {
                    let pairs = read_pairs(ctx, column, current, height);
                    object_token(fields, &pairs).map_err(wrap)?
                }
                (TypeDescriptor::List(elem), true) => {
                    let fields = elem.as_object().ok_or_else(|| {
                        wrap(BuildError::ListNeedsObject {
                            name: column.name.clone(),
                            ty: column.token.clone(),
                        })
                    })?;
                    list_token(ctx, column, fields, current, height).map_err(wrap)?
                }
                _ => sheet.cell_text(current, column.index),
            };
            if column.index == 0 {
                if let Some(n) = strip {
                    raw = raw.trim_start().chars().skip(n).collect();
                }
            }
            if !raw.is_empty() {
                builder
                    .data(Parent::Object(&mut item), &column.ty, &column.name, &raw, &location)
                    .map_err(wrap)?;
            }
        }

        if item.is_empty() {
            continue;
        }
        if map_level.is_some() {
            let mut keys = Vec::with_capacity(key_columns.len());
            for column in key_columns {
                let key = item
                    .get(&Key::from(column.name.as_str()))
                    .and_then(Value::as_scalar)
                    .map(|s| s.to_key())
                    .ok_or_else(|| {
                        ExportError::at(
                            ctx.location.at(current, column.index),
                            BuildError::MissingMapKey(column.name.clone()),
                        )
                    })?;
                keys.push(key);
            }
            insert_keyed(&mut keyed, &keys, item)
                .map_err(|e| ExportError::at(ctx.location.at(current, 0), e))?;
        } else {
            list.push(Value::Object(item));
        }
    }

    Ok(Extracted {
        schema,
        data: data(list, keyed),
    })
}

/// Walk header columns with merged-width skipping and parse the type of
/// each exported column once.
fn read_header(
    ctx: &SheetContext<'_>,
    builder: &mut RecordBuilder<'_>,
    schema: &mut Fields,
) -> Result<Vec<Column>, ExportError> {
    let sheet = ctx.sheet;
    let mut columns = Vec::new();
    let mut col = 0;
    while col < sheet.col_count() {
        let (_, width) = sheet.cell_size(SIGN_ROW, col);
        let index = col;
        col += width;

        let token = sheet.cell_text(TYPE_ROW, index).trim().to_string();
        let name = sheet.cell_text(NAME_ROW, index).trim().to_string();
        let sign = sheet.cell_text(SIGN_ROW, index);
        if token.is_empty() || name.is_empty() || !ctx.signs.matches(sign.trim()) {
            continue;
        }

        let ty = parse_type(&token)
            .map_err(|e| ExportError::at(ctx.location.at(TYPE_ROW, index), e.into()))?;
        if ctx.with_schema {
            let description = sheet.cell_text(DESCRIPTION_ROW, index);
            builder
                .schema(
                    Parent::Object(&mut *schema),
                    &ty,
                    &name,
                    Some(description.trim()),
                )
                .map_err(|e| ExportError::at(ctx.location.at(NAME_ROW, index), e))?;
        }
        columns.push(Column {
            index,
            width,
            token,
            ty,
            name,
        });
    }
    Ok(columns)
}

/// `!token!value`: the sign token guarding a single row.
fn sign_prefix(first: &str) -> Option<&str> {
    let rest = first.strip_prefix('!')?;
    let end = rest.find('!')?;
    (end > 0).then(|| &rest[..end])
}

/// Key/type/value triples laid out over three columns and several sub-rows.
fn build_map_cell(
    ctx: &SheetContext<'_>,
    builder: &mut RecordBuilder<'_>,
    column: &Column,
    row: u32,
    height: u32,
) -> Result<Fields, ExportError> {
    let sheet = ctx.sheet;
    let mut sub = Fields::new();
    for r in row..row + height {
        let key = sheet.cell_text(r, column.index);
        let token = sheet.cell_text(r, column.index + 1);
        let value = sheet.cell_text(r, column.index + 2);
        let (key, token, value) = (key.trim(), token.trim(), value.trim());
        if key.is_empty() || token.is_empty() || value.is_empty() {
            continue;
        }
        let location = ctx.location.at(r, column.index);
        let ty = parse_type(token).map_err(|e| ExportError::at(location.clone(), e.into()))?;
        builder
            .data(Parent::Object(&mut sub), &ty, key, value, &location)
            .map_err(|e| ExportError::at(location.clone(), e))?;
    }
    Ok(sub)
}

/// Key/value pairs over two columns; later keys overwrite earlier ones.
fn read_pairs(
    ctx: &SheetContext<'_>,
    column: &Column,
    row: u32,
    height: u32,
) -> IndexMap<String, String> {
    let mut pairs = IndexMap::new();
    for r in row..row + height {
        let key = ctx.sheet.cell_text(r, column.index).trim().to_string();
        let value = ctx.sheet.cell_text(r, column.index + 1).trim().to_string();
        pairs.insert(key, value);
    }
    pairs
}

/// Pairs grouped into list elements; a new element starts whenever the
/// first declared field's key shows up again.
fn list_token(
    ctx: &SheetContext<'_>,
    column: &Column,
    fields: &[FieldDecl],
    row: u32,
    height: u32,
) -> Result<String, BuildError> {
    let Some(first) = fields.first().map(|f| f.name.as_str()) else {
        return Ok(String::new());
    };
    let mut tokens = Vec::new();
    let mut current: IndexMap<String, String> = IndexMap::new();
    for r in row..row + height {
        let key = ctx.sheet.cell_text(r, column.index).trim().to_string();
        let value = ctx.sheet.cell_text(r, column.index + 1).trim().to_string();
        if key == first {
            if current.contains_key(first) {
                tokens.push(object_token(fields, &current)?);
            }
            current.clear();
        }
        current.insert(key, value);
    }
    if current.contains_key(first) {
        tokens.push(object_token(fields, &current)?);
    }
    Ok(tokens.join(","))
}

/// Colon-joined values in declared field order, normalized through each
/// field's scalar kind. Missing fields render empty.
fn object_token(fields: &[FieldDecl], pairs: &IndexMap<String, String>) -> Result<String, BuildError> {
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        let part = match (pairs.get(&field.name), field.ty.scalar_kind()) {
            (Some(raw), Some(kind)) => convert_scalar(kind, raw)?
                .map(|s| s.to_string())
                .unwrap_or_default(),
            (Some(raw), None) => raw.clone(),
            (None, _) => String::new(),
        };
        parts.push(part);
    }
    Ok(parts.join(":"))
}

/// Insert `item` at `keys` in a nested mapping, creating levels on demand.
fn insert_keyed(root: &mut Fields, keys: &[Key], item: Fields) -> Result<(), BuildError> {
    let Some((last, parents)) = keys.split_last() else {
        return Ok(());
    };
    let mut node = root;
    for key in parents {
        node = match node.entry(key.clone()).or_insert_with(Value::object) {
            Value::Object(fields) => fields,
            _ => return Err(BuildError::MapKeyConflict(key.to_string())),
        };
    }
    if node.insert(last.clone(), Value::Object(item)).is_some() {
        warn!(key = %last, "duplicate map key; later row wins");
    }
    Ok(())
}
