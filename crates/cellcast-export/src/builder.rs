//! Type-driven construction of record trees.
//!
//! The same [`TypeDescriptor`] drives two passes: schema mode describes the
//! column (`[typename, description?]` entries for the manifest) and data mode
//! converts raw cell text into typed [`Value`]s.

use cellcast_common::{Fields, Key, Location, Scalar, Value};
use cellcast_parse::{ScalarKind, TypeDescriptor};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constraint::Constraint;
use crate::error::BuildError;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(_|[A-Za-z])\w*$").expect("identifier pattern"));

/// Placeholder standing in for `\,` while a list literal is split.
const ESCAPED_COMMA: char = '\0';

/// Where a built value goes: appended to a sequence or set on a mapping.
pub enum Parent<'a> {
    List(&'a mut Vec<Value>),
    Object(&'a mut Fields),
}

pub struct RecordBuilder<'q> {
    constraints: &'q mut Vec<Constraint>,
}

impl<'q> RecordBuilder<'q> {
    pub fn new(constraints: &'q mut Vec<Constraint>) -> Self {
        Self { constraints }
    }

    /// Write the schema entry for `name` into `parent`.
    pub fn schema(
        &mut self,
        parent: Parent<'_>,
        ty: &TypeDescriptor,
        name: &str,
        description: Option<&str>,
    ) -> Result<(), BuildError> {
        match ty {
            TypeDescriptor::List(elem) => {
                let mut exemplar = Vec::new();
                self.schema(Parent::List(&mut exemplar), elem, name, None)?;
                let head = exemplar.pop().unwrap_or_else(Value::object);
                fill(parent, &format!("{name}s"), schema_entry(head, description), true)
            }
            TypeDescriptor::Object(fields) => {
                let mut obj = Fields::new();
                for field in fields {
                    self.schema(Parent::Object(&mut obj), &field.ty, &field.name, None)?;
                }
                fill(parent, name, schema_entry(Value::Object(obj), description), true)
            }
            TypeDescriptor::Map | TypeDescriptor::Scalar(_) | TypeDescriptor::Bound(_) => {
                let head = Value::from(ty.schema_name());
                fill(parent, name, schema_entry(head, description), true)
            }
        }
    }

    /// Convert `raw` according to `ty` and write it into `parent`.
    pub fn data(
        &mut self,
        parent: Parent<'_>,
        ty: &TypeDescriptor,
        name: &str,
        raw: &str,
        location: &Location,
    ) -> Result<(), BuildError> {
        match ty {
            TypeDescriptor::List(elem) => {
                let mut items = Vec::new();
                for part in split_list(raw) {
                    self.data(Parent::List(&mut items), elem, name, &part, location)?;
                }
                fill(parent, &format!("{name}s"), Value::List(items), false)
            }
            TypeDescriptor::Object(fields) => {
                let inner = raw.trim_matches(|c| c == '{' || c == '}');
                let mut obj = Fields::new();
                for (field, part) in fields.iter().zip(inner.split(':')) {
                    self.data(Parent::Object(&mut obj), &field.ty, &field.name, part, location)?;
                }
                fill(parent, name, Value::Object(obj), false)
            }
            TypeDescriptor::Map => Err(BuildError::MapNeedsColumns(name.to_string())),
            TypeDescriptor::Scalar(kind) => match convert_scalar(*kind, raw)? {
                Some(value) => fill(parent, name, Value::Scalar(value), false),
                None => Ok(()),
            },
            TypeDescriptor::Bound(bound) => {
                let Some(value) = convert_scalar(bound.kind, raw)? else {
                    return Ok(());
                };
                fill(parent, name, Value::Scalar(value.clone()), false)?;
                self.constraints.push(Constraint {
                    mark: bound.mark.clone(),
                    field: bound.field.clone(),
                    via: bound.via.clone(),
                    value,
                    ty: ty.to_string(),
                    name: name.to_string(),
                    location: location.clone(),
                });
                Ok(())
            }
        }
    }
}

/// Store `value` under `name`. Mapping parents enforce the identifier rule
/// in schema mode.
pub fn fill(parent: Parent<'_>, name: &str, value: Value, schema: bool) -> Result<(), BuildError> {
    match parent {
        Parent::List(items) => items.push(value),
        Parent::Object(fields) => {
            if schema && !IDENTIFIER_RE.is_match(name) {
                return Err(BuildError::IllegalIdentifier(name.to_string()));
            }
            fields.insert(Key::from(name), value);
        }
    }
    Ok(())
}

fn schema_entry(head: Value, description: Option<&str>) -> Value {
    let mut entry = vec![head];
    if let Some(desc) = description.filter(|d| !d.is_empty()) {
        entry.push(Value::from(desc));
    }
    Value::List(entry)
}

/// Split a list literal on commas. `\,` survives as a literal comma.
fn split_list(raw: &str) -> Vec<String> {
    let inner = raw.trim_matches(|c| c == '[' || c == ']');
    let protected = inner.replace("\\,", &ESCAPED_COMMA.to_string());
    protected
        .split(',')
        .map(|part| part.replace(ESCAPED_COMMA, ","))
        .collect()
}

/// Typed conversion of one leaf. Blank text for non-string kinds yields
/// `None` (nothing is written).
pub fn convert_scalar(kind: ScalarKind, raw: &str) -> Result<Option<Scalar>, BuildError> {
    let text = raw.trim();
    if text.is_empty() && kind != ScalarKind::String {
        return Ok(None);
    }
    let invalid = || BuildError::InvalidNumber {
        value: raw.to_string(),
        kind,
    };
    let value = match kind {
        ScalarKind::Int => {
            let f: f64 = text.parse().map_err(|_| invalid())?;
            Scalar::Int(truncate(f).ok_or_else(invalid)?)
        }
        ScalarKind::Double => Scalar::Double(text.parse().map_err(|_| invalid())?),
        ScalarKind::String => {
            // numeric cells read back as "123.0"
            let normalized = raw
                .strip_suffix(".0")
                .and_then(|_| text.parse::<f64>().ok())
                .and_then(truncate)
                .map(|i| i.to_string());
            Scalar::Str(normalized.unwrap_or_else(|| raw.to_string()))
        }
        ScalarKind::Bool => Scalar::Bool(parse_bool(text)?),
    };
    Ok(Some(value))
}

fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

fn parse_bool(text: &str) -> Result<bool, BuildError> {
    if let Ok(f) = text.parse::<f64>() {
        if let Some(i) = truncate(f) {
            return Ok(i != 0);
        }
    }
    match text.to_lowercase().as_str() {
        "false" | "no" | "off" => Ok(false),
        "true" | "yes" | "on" => Ok(true),
        _ => Err(BuildError::IllegalBool(text.to_string())),
    }
}
