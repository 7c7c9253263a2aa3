use crate::stmt::Value;

use serde::{Deserialize, Serialize};

/// The declared kind of a scalar field.
///
/// Kinds are advisory: payload values are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPrimitive {
    String,
    Number,
    Boolean,
    #[serde(rename = "bigint")]
    BigInt,
}

impl FieldPrimitive {
    /// Returns `true` if `value` has the shape this kind describes. Null always
    /// matches.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldPrimitive::String, Value::String(_)) => true,
            (FieldPrimitive::Number, Value::Number(_)) => true,
            (FieldPrimitive::Boolean, Value::Bool(_)) => true,
            // Big integers arrive as integers or as decimal strings.
            (FieldPrimitive::BigInt, Value::Number(num)) => num.is_i64() || num.is_u64(),
            (FieldPrimitive::BigInt, Value::String(s)) => {
                let digits = s.strip_prefix('-').unwrap_or(s);
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            }
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldPrimitive::String => "string",
            FieldPrimitive::Number => "number",
            FieldPrimitive::Boolean => "boolean",
            FieldPrimitive::BigInt => "bigint",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_deserialize_from_lowercase_names() {
        let kinds: Vec<FieldPrimitive> =
            serde_json::from_value(json!(["string", "number", "boolean", "bigint"])).unwrap();
        assert_eq!(
            kinds,
            [
                FieldPrimitive::String,
                FieldPrimitive::Number,
                FieldPrimitive::Boolean,
                FieldPrimitive::BigInt
            ]
        );
    }

    #[test]
    fn bigint_accepts_integer_strings() {
        assert!(FieldPrimitive::BigInt.matches(&json!("-12345678901234567890")));
        assert!(FieldPrimitive::BigInt.matches(&json!(42)));
        assert!(!FieldPrimitive::BigInt.matches(&json!("12a")));
        assert!(!FieldPrimitive::BigInt.matches(&json!(1.5)));
    }

    #[test]
    fn null_matches_every_kind() {
        assert!(FieldPrimitive::Boolean.matches(&Value::Null));
        assert!(!FieldPrimitive::Boolean.matches(&json!("true")));
    }
}
