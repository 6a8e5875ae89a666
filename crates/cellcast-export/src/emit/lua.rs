use cellcast_common::{Key, Value};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{newline, scalar_literal};

static LUA_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("lua identifier pattern"));

/// `return { ... }` table literal.
pub fn to_lua(data: &Value) -> String {
    let mut out = String::from("return ");
    write_value(&mut out, data, 1);
    out
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Scalar(s) => out.push_str(&scalar_literal(s)),
        Value::List(items) => {
            out.push('{');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent);
                write_value(out, item, indent + 1);
            }
            newline(out, indent - 1);
            out.push('}');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent);
                write_key(out, key);
                out.push_str(" = ");
                write_value(out, item, indent + 1);
            }
            newline(out, indent - 1);
            out.push('}');
        }
    }
}

fn write_key(out: &mut String, key: &Key) {
    match key {
        Key::Int(i) => out.push_str(&format!("[{i}]")),
        Key::Str(s) if LUA_IDENT.is_match(s) => out.push_str(s),
        Key::Str(s) => {
            out.push('[');
            out.push_str(&serde_json::Value::from(s.as_str()).to_string());
            out.push(']');
        }
    }
}
