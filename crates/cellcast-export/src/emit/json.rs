use cellcast_common::Value;

use crate::error::ExportError;

/// Two-space pretty JSON; integer map keys become strings.
pub fn to_json(data: &Value) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcast_common::{Fields, Key, Scalar};

    #[test]
    fn pretty_output_keeps_order() {
        let mut f = Fields::new();
        f.insert(Key::from("b"), Value::from(1));
        f.insert(Key::from("a"), Value::Scalar(Scalar::Double(2.0)));
        f.insert(Key::Int(7), Value::from("x"));
        let out = to_json(&Value::Object(f)).unwrap();
        assert_eq!(out, "{\n  \"b\": 1,\n  \"a\": 2.0,\n  \"7\": \"x\"\n}");
    }
}
