use cellcast_common::Value;

use super::{newline, scalar_literal};

/// `key = value` lines and `key { ... }` blocks.
pub fn to_ycl(data: &Value) -> String {
    let mut out = String::new();
    write_entries(&mut out, data, 0);
    match out.strip_prefix('\n') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

fn write_entries(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::List(items) => {
            for item in items {
                newline(out, indent);
                write_body(out, item, false, indent);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                newline(out, indent);
                out.push_str(&key.to_string());
                write_body(out, item, true, indent);
            }
        }
        Value::Scalar(s) => {
            newline(out, indent);
            out.push_str(&scalar_literal(s));
        }
    }
}

fn write_body(out: &mut String, value: &Value, keyed: bool, indent: usize) {
    match value {
        Value::Scalar(s) => {
            if keyed {
                out.push_str(" = ");
            }
            out.push_str(&scalar_literal(s));
        }
        _ => {
            if keyed {
                out.push(' ');
            }
            out.push('{');
            write_entries(out, value, indent + 1);
            newline(out, indent);
            out.push('}');
        }
    }
}
