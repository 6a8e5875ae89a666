use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{BoundReference, FieldDecl, ScalarKind, TypeDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("`{0}` is not a legal type")]
    IllegalType(String),
}

static BOUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(int|string)\s*\((\w+)\.(\w+)(?:\.(\w+))?\)$").expect("bound reference pattern")
});

/// Parse a column type token such as `int`, `string[]`, `{int id:string name}[]`
/// or `int(Item.id)`.
///
/// The token is trimmed first. List suffixes bind loosest, so `{int a}[]` is
/// a list of objects.
pub fn parse_type(token: &str) -> Result<TypeDescriptor, TypeError> {
    let token = token.trim();

    if let Some(inner) = token.strip_suffix("[]") {
        return Ok(TypeDescriptor::List(Box::new(parse_type(inner)?)));
    }

    if let Some(inner) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        return parse_object(token, inner);
    }

    if token == "map" {
        return Ok(TypeDescriptor::Map);
    }
    if let Some(kind) = ScalarKind::from_name(token) {
        return Ok(TypeDescriptor::Scalar(kind));
    }

    if let Some(caps) = BOUND_RE.captures(token) {
        let kind = ScalarKind::from_name(&caps[1]).ok_or_else(|| illegal(token))?;
        let mark = caps[2].to_string();
        let (via, field) = match caps.get(4) {
            Some(last) => (Some(caps[3].to_string()), last.as_str().to_string()),
            None => (None, caps[3].to_string()),
        };
        return Ok(TypeDescriptor::Bound(BoundReference {
            kind,
            mark,
            field,
            via,
        }));
    }

    Err(illegal(token))
}

fn parse_object(token: &str, inner: &str) -> Result<TypeDescriptor, TypeError> {
    let mut fields = Vec::new();
    for part in inner.split(':') {
        let words: Vec<&str> = part.split_whitespace().collect();
        let [ty, name] = words.as_slice() else {
            return Err(illegal(token));
        };
        fields.push(FieldDecl {
            ty: parse_type(ty)?,
            name: (*name).to_string(),
        });
    }
    Ok(TypeDescriptor::Object(fields))
}

fn illegal(token: &str) -> TypeError {
    TypeError::IllegalType(token.to_string())
}
