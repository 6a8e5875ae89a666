use cellcast_common::{Location, Scalar, Value};
use tracing::debug;

use crate::error::ExportError;
use crate::record::Record;

/// A reference declared by a bound column (`int(Item.id)`), checked once
/// every sheet has been extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub mark: String,
    pub field: String,
    /// Intermediate collection: the check descends into `via + "s"`.
    pub via: Option<String>,
    pub value: Scalar,
    /// Declaring type token, e.g. `int(Item.id)`.
    pub ty: String,
    pub name: String,
    pub location: Location,
}

/// Check every constraint against the extracted records. Fails on the first
/// reference that cannot be resolved.
pub fn validate(records: &[Record], constraints: &[Constraint]) -> Result<(), ExportError> {
    for c in constraints {
        let record = records
            .iter()
            .find(|r| r.item.as_deref() == Some(c.mark.as_str()) || r.export_mark == c.mark)
            .ok_or_else(|| ExportError::UnresolvedMark {
                mark: c.mark.clone(),
                name: c.name.clone(),
                ty: c.ty.clone(),
                location: c.location.clone(),
            })?;

        let collection = match &c.via {
            Some(via) => {
                let key = format!("{via}s");
                record
                    .data
                    .get(&key)
                    .ok_or_else(|| ExportError::MissingCollection {
                        mark: c.mark.clone(),
                        collection: key,
                        location: c.location.clone(),
                    })?
            }
            None => &record.data,
        };

        if !contains(collection, &c.field, &c.value) {
            return Err(ExportError::UnresolvedValue {
                mark: c.mark.clone(),
                field: c.field.clone(),
                value: c.value.to_string(),
                name: c.name.clone(),
                ty: c.ty.clone(),
                location: c.location.clone(),
            });
        }
    }
    debug!(count = constraints.len(), "constraints resolved");
    Ok(())
}

/// Whether some entry of `collection` has `field` equal to `value`.
/// Mapping entries without the field are searched as nested map levels.
fn contains(collection: &Value, field: &str, value: &Scalar) -> bool {
    match collection {
        Value::List(items) => items.iter().any(|entry| entry_matches(entry, field, value)),
        Value::Object(fields) => fields.values().any(|entry| {
            entry_matches(entry, field, value)
                || (entry.get(field).is_none() && contains(entry, field, value))
        }),
        Value::Scalar(_) => false,
    }
}

fn entry_matches(entry: &Value, field: &str, value: &Scalar) -> bool {
    entry
        .get(field)
        .and_then(Value::as_scalar)
        .is_some_and(|s| s.matches(value))
}
